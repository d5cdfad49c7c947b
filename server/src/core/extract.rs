//! JSON body extractor that validates before the handler runs.

use crate::core::AppError;
use axum::extract::{FromRequest, Json, Request, rejection::JsonRejection};
use serde::de::DeserializeOwned;
use tracing::debug;
use validator::Validate;

/// Like [`Json`], but malformed bodies and failed validation are both
/// rejected with 400 and the `{"errors": [...]}` body.
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                debug!("Rejected request body: {}", rejection.body_text());
                AppError::bad_request(rejection.body_text())
            })?;

        value.validate()?;
        Ok(ValidJson(value))
    }
}
