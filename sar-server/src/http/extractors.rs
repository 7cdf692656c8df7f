//! Custom Axum extractors

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// JSON body whose rejections surface as 400 `validation_error`
///
/// Wrong primitive types, missing fields and unparseable bodies all map to
/// invalid-input instead of axum's plain-text 415/422 responses.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                tracing::error!(error = %rejection.body_text(), "rejected request body");
                ApiError::MalformedBody {
                    message: rejection.body_text(),
                }
            })?;
        Ok(Self(value))
    }
}
