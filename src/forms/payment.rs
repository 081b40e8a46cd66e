use serde::Deserialize;
use thiserror::Error;

use crate::domain::booking::PaymentMethod;

/// Errors that can occur while processing the payment form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentFormError {
    #[error("unknown payment method `{0}`")]
    UnknownMethod(String),
    #[error("the booking terms must be accepted")]
    TermsNotAccepted,
}

/// Form payload submitted from the payment page.
#[derive(Debug, Deserialize)]
pub struct PaymentForm {
    pub payment_method: String,
    /// Checkbox; present only when ticked.
    #[serde(default)]
    pub accept_terms: Option<String>,
}

impl PaymentForm {
    pub fn into_payment_method(self) -> Result<PaymentMethod, PaymentFormError> {
        if self.accept_terms.as_deref().is_none_or(str::is_empty) {
            return Err(PaymentFormError::TermsNotAccepted);
        }
        PaymentMethod::parse(&self.payment_method)
            .ok_or(PaymentFormError::UnknownMethod(self.payment_method))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_method_with_terms_is_accepted() {
        let form = PaymentForm {
            payment_method: "pay_at_hotel".to_string(),
            accept_terms: Some("on".to_string()),
        };
        assert_eq!(form.into_payment_method(), Ok(PaymentMethod::PayAtHotel));
    }

    #[test]
    fn terms_must_be_ticked() {
        let form = PaymentForm {
            payment_method: "card".to_string(),
            accept_terms: None,
        };
        assert_eq!(
            form.into_payment_method(),
            Err(PaymentFormError::TermsNotAccepted)
        );
    }

    #[test]
    fn unknown_method_is_rejected() {
        let form = PaymentForm {
            payment_method: "crypto".to_string(),
            accept_terms: Some("on".to_string()),
        };
        assert_eq!(
            form.into_payment_method(),
            Err(PaymentFormError::UnknownMethod("crypto".to_string()))
        );
    }
}
