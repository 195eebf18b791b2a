use validator::Validate;

use crate::{ServiceError, ServiceResult};

#[derive(Validate)]
struct EmailValidator {
    #[validate(email)]
    email: String,
}

pub fn validate_email(email: &str) -> ServiceResult<String> {
    let validator = EmailValidator {
        email: email.trim().to_string(),
    };
    if let Err(e) = validator.validate() {
        return ServiceError::bad_request(format!("Invalid email: {}", e));
    }
    Ok(validator.email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert_eq!(
            validate_email(" crimp@crag.example ").ok(),
            Some("crimp@crag.example".to_string())
        );
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("").is_err());
    }
}
