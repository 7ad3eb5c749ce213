// src/users/validators.rs

use super::models::CreateUserRequest;
use crate::common::{ValidationResult, Validator};
use crate::cv::validators::is_plausible_email;

pub struct CreateUserValidator;

impl Validator<CreateUserRequest> for CreateUserValidator {
    fn validate(&self, data: &CreateUserRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.name.trim().is_empty() {
            result.add_error("name", "Name is required");
        }
        if data.name.len() > 255 {
            result.add_error("name", "Name must not exceed 255 characters");
        }
        if !data.email.is_empty() && !is_plausible_email(&data.email) {
            result.add_error("email", "Email address is not well-formed");
        }

        result
    }
}
