//! Auth DTOs - sign-up, log-in e risposta con token

use super::{UserDTO, trimmed};
use crate::entities::User;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "passwords_match", skip_on_field_errors = false))]
pub struct SignUpDTO {
    #[serde(deserialize_with = "trimmed")]
    #[validate(custom(function = "username_rules"))]
    pub username: String,
    #[validate(length(min = 5, message = "Password must be at least 5 characters."))]
    pub password: String,
    pub confirm_password: String,
}

fn username_rules(username: &str) -> Result<(), ValidationError> {
    let message = if username.is_empty() {
        "Username cannot be empty."
    } else if username.chars().count() > 100 {
        "Username cannot exceed 100 characters."
    } else if User::is_reserved_username(username) {
        "This username is reserved."
    } else {
        return Ok(());
    };

    let mut err = ValidationError::new("username");
    err.message = Some(message.into());
    Err(err)
}

fn passwords_match(dto: &SignUpDTO) -> Result<(), ValidationError> {
    if dto.password != dto.confirm_password {
        let mut err = ValidationError::new("passwords_match");
        err.message = Some("Passwords do not match.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Deserialize, Debug, Validate)]
pub struct LogInDTO {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "Username cannot be empty."))]
    pub username: String,
    #[validate(length(min = 1, message = "Password cannot be empty."))]
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponseDTO {
    pub token: String,
    pub user: UserDTO,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up(json: serde_json::Value) -> SignUpDTO {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn username_is_trimmed_before_validation() {
        let dto = sign_up(serde_json::json!({
            "username": "   ",
            "password": "secret",
            "confirmPassword": "secret"
        }));
        assert_eq!(dto.username, "");
        assert!(dto.validate().is_err());
    }

    #[test]
    fn long_username_is_rejected() {
        let dto = sign_up(serde_json::json!({
            "username": "x".repeat(101),
            "password": "secret",
            "confirmPassword": "secret"
        }));
        let errors = dto.validate().unwrap_err();
        let message = errors.field_errors()["username"][0].message.clone().unwrap();
        assert_eq!(message, "Username cannot exceed 100 characters.");
    }

    #[test]
    fn guest_username_is_reserved_in_any_case() {
        for username in ["guest-user", "Guest-User"] {
            let dto = sign_up(serde_json::json!({
                "username": username,
                "password": "secret",
                "confirmPassword": "secret"
            }));
            let errors = dto.validate().unwrap_err();
            let message = errors.field_errors()["username"][0].message.clone().unwrap();
            assert_eq!(message, "This username is reserved.");
        }
    }

    #[test]
    fn mismatched_passwords_are_rejected() {
        let dto = sign_up(serde_json::json!({
            "username": "john",
            "password": "secret",
            "confirmPassword": "secreT"
        }));
        let errors = dto.validate().unwrap_err();
        assert!(errors.errors().contains_key("__all__"));
    }

    #[test]
    fn valid_sign_up_passes() {
        let dto = sign_up(serde_json::json!({
            "username": " john ",
            "password": "secret",
            "confirmPassword": "secret"
        }));
        assert_eq!(dto.username, "john");
        assert!(dto.validate().is_ok());
    }
}
