use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::domain::promotion::normalize_code;

const CODE_MAX_LEN: u64 = 32;

/// Form payload submitted when a guest enters a promotion code.
#[derive(Debug, Deserialize, Validate)]
pub struct PromoCodeForm {
    #[validate(length(min = 1, max = CODE_MAX_LEN))]
    pub code: String,
}

impl PromoCodeForm {
    /// Validated, upper-cased code.
    pub fn into_code(self) -> Result<String, ValidationErrors> {
        let code = PromoCodeForm {
            code: normalize_code(&self.code),
        };
        code.validate()?;
        Ok(code.code)
    }
}
