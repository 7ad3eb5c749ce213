// src/cv/validators.rs

use super::models::UpdateExtractedInfoRequest;
use crate::common::{ValidationResult, Validator};

/// Loose pattern check used for user-supplied email fields: one '@' with a
/// dotted, non-empty domain. Extraction output is best-effort, so this
/// intentionally stays permissive.
pub fn is_plausible_email(email: &str) -> bool {
    if email.len() > 255 {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

pub struct UpdateExtractedInfoValidator;

impl Validator<UpdateExtractedInfoRequest> for UpdateExtractedInfoValidator {
    fn validate(&self, data: &UpdateExtractedInfoRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(email) = &data.email {
            if !email.is_empty() && !is_plausible_email(email) {
                result.add_error("email", "Email address is not well-formed");
            }
        }

        if let Some(name) = &data.name {
            if name.len() > 255 {
                result.add_error("name", "Name must not exceed 255 characters");
            }
        }

        if let Some(phone) = &data.phone {
            if phone.len() > 64 {
                result.add_error("phone", "Phone number must not exceed 64 characters");
            }
        }

        result
    }
}
