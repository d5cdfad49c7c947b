use crate::engine::EngineError;
use crate::media::MediaError;
use crate::repositories::StoreError;
use axum::{Json, extract::multipart::MultipartError, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::error;

#[derive(Serialize)]
struct ErrorMessage {
    message: String,
}

/// Body of every error response: `{"errors": [{"message": "..."}]}`
#[derive(Serialize)]
struct ErrorResponse {
    errors: Vec<ErrorMessage>,
}

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    messages: Vec<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            messages: vec![message.into()],
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    // Common error constructors
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn unprocessable_entity(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::not_found("Resource not found"),

            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                error!("Database pool unavailable: {}", err);
                Self::service_unavailable("Database unavailable")
            }

            _ => {
                error!("Unhandled database error: {:?}", err);
                Self::internal_server_error("Internal server error")
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::not_found("Resource not found"),
            StoreError::UniqueViolation(_) => Self::conflict("Resource already exists"),
            StoreError::ForeignKeyViolation(_) => Self::unprocessable_entity("Invalid user ID."),
            StoreError::Database(e) => Self::from(e),
        }
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Forbidden(message) => Self::forbidden(message),
            EngineError::NotFound(message) => Self::not_found(message),
            EngineError::Conflict(message) => Self::conflict(message),
            EngineError::UnprocessableEntity(message) => Self::unprocessable_entity(message),
            EngineError::Store(e) => Self::from(e),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = err.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let messages: Vec<String> = fields
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();

        if messages.is_empty() {
            return Self::bad_request("Validation error");
        }

        Self {
            status: StatusCode::BAD_REQUEST,
            messages,
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        Self::bad_request(format!("Invalid multipart body: {}", err.body_text()))
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::Io(e) => {
                error!("Image storage failed: {:?}", e);
                Self::internal_server_error("Internal server error")
            }
            other => Self::bad_request(other.to_string()),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        error!("Token signing failed: {:?}", err);
        Self::internal_server_error("Internal server error")
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        error!("Password hashing failed: {:?}", err);
        Self::internal_server_error("Internal server error")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(ErrorResponse {
            errors: self
                .messages
                .into_iter()
                .map(|message| ErrorMessage { message })
                .collect(),
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Name cannot be empty."))]
        name: String,
        #[validate(length(min = 5, message = "Password must be at least 5 characters."))]
        password: String,
    }

    #[test]
    fn validation_errors_become_bad_request_with_every_message() {
        let sample = Sample {
            name: String::new(),
            password: "abc".to_string(),
        };
        let err = AppError::from(sample.validate().unwrap_err());

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.messages(),
            ["Name cannot be empty.", "Password must be at least 5 characters."]
        );
    }

    #[test]
    fn engine_errors_map_one_to_one() {
        let cases = [
            (EngineError::Forbidden("f".into()), StatusCode::FORBIDDEN),
            (EngineError::NotFound("n".into()), StatusCode::NOT_FOUND),
            (EngineError::Conflict("c".into()), StatusCode::CONFLICT),
            (
                EngineError::UnprocessableEntity("u".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];
        for (engine_error, status) in cases {
            assert_eq!(AppError::from(engine_error).status(), status);
        }
    }

    #[test]
    fn pool_timeouts_are_service_unavailable() {
        let err = AppError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
