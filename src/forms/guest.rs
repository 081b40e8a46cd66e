use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::draft::GuestDetails;
use crate::forms::{empty_string_as_none, sanitize_inline_text};

const NAME_MAX_LEN: u64 = 64;
const ADDRESS_MAX_LEN: u64 = 256;

pub type GuestFormResult<T> = Result<T, GuestFormError>;

/// Errors that can occur while processing the guest details form.
#[derive(Debug, Error)]
pub enum GuestFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },
}

/// Form payload submitted from the personal details page.
#[derive(Debug, Deserialize, Validate)]
pub struct GuestDetailsForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub first_name: String,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(length(min = 2, max = NAME_MAX_LEN))]
    pub nationality: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = ADDRESS_MAX_LEN))]
    pub address: Option<String>,
}

impl GuestDetailsForm {
    /// Validate and sanitize the payload into draft guest details.
    pub fn into_guest_details(self) -> GuestFormResult<GuestDetails> {
        self.validate()?;

        let required = |field: &'static str, value: &str| {
            let sanitized = sanitize_inline_text(value);
            if sanitized.is_empty() {
                Err(GuestFormError::EmptyField { field })
            } else {
                Ok(sanitized)
            }
        };

        Ok(GuestDetails {
            first_name: required("first name", &self.first_name)?,
            last_name: required("last name", &self.last_name)?,
            email: self.email.trim().to_lowercase(),
            phone: required("phone", &self.phone)?,
            nationality: required("nationality", &self.nationality)?,
            address: self
                .address
                .as_deref()
                .map(sanitize_inline_text)
                .filter(|value| !value.is_empty()),
        })
    }
}

/// Phone numbers: 6 to 20 digits, optionally with `+`, spaces, dashes and
/// parentheses.
fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let trimmed = phone.trim();
    let allowed = trimmed
        .chars()
        .enumerate()
        .all(|(i, c)| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')') || (c == '+' && i == 0));
    let digits = trimmed.chars().filter(char::is_ascii_digit).count();

    if allowed && (6..=20).contains(&digits) {
        Ok(())
    } else {
        Err(ValidationError::new("phone"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> GuestDetailsForm {
        GuestDetailsForm {
            first_name: " Ada ".to_string(),
            last_name: "Lovelace".to_string(),
            email: " Ada@Example.com ".to_string(),
            phone: "+44 (20) 7946-0000".to_string(),
            nationality: "United Kingdom".to_string(),
            address: Some("  ".to_string()),
        }
    }

    #[test]
    fn valid_form_is_sanitized() {
        let mut form = form();
        form.email = "Ada@Example.com".to_string();
        let guest = form.into_guest_details().unwrap();
        assert_eq!(guest.first_name, "Ada");
        assert_eq!(guest.email, "ada@example.com");
        assert_eq!(guest.address, None);
        assert!(guest.is_complete());
    }

    #[test]
    fn invalid_email_is_rejected() {
        let mut form = form();
        form.email = "not-an-email".to_string();
        assert!(matches!(
            form.into_guest_details(),
            Err(GuestFormError::Validation(_))
        ));
    }

    #[test]
    fn phone_numbers_are_checked() {
        assert!(validate_phone("+1 555 123 4567").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("555-CALL-NOW").is_err());
        assert!(validate_phone("55+5123456").is_err());
    }

    #[test]
    fn blank_names_are_rejected() {
        let mut form = form();
        form.email = "ada@example.com".to_string();
        form.first_name = "   ".to_string();
        assert!(matches!(
            form.into_guest_details(),
            Err(GuestFormError::EmptyField {
                field: "first name"
            })
        ));
    }
}
