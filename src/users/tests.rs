//! Tests for the users module

#[cfg(test)]
mod tests {
    use super::super::models::CreateUserRequest;
    use super::super::validators::CreateUserValidator;
    use crate::common::Validator;

    #[test]
    fn test_create_user_validation_success() {
        let request = CreateUserRequest {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
        };
        let result = CreateUserValidator.validate(&request);
        assert!(result.is_valid);
    }

    #[test]
    fn test_create_user_validation_empty_name() {
        let request = CreateUserRequest {
            name: "   ".to_string(),
            email: String::new(),
        };
        let result = CreateUserValidator.validate(&request);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "name"));
    }

    #[test]
    fn test_create_user_validation_allows_empty_email() {
        // Upload auto-creates owners with a possibly-empty email; the same
        // rule applies to explicit creation
        let request = CreateUserRequest {
            name: "Jane Doe".to_string(),
            email: String::new(),
        };
        let result = CreateUserValidator.validate(&request);
        assert!(result.is_valid);
    }

    #[test]
    fn test_create_user_request_defaults_email() {
        let request: CreateUserRequest = serde_json::from_str(r#"{"name": "Jane"}"#).unwrap();
        assert_eq!(request.email, "");
    }
}
