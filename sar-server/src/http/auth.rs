//! Bearer-token authentication middleware
//!
//! Only checks that a non-empty bearer token is present. Token contents are
//! not verified here. Paths in the exclude set pass through untouched.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use super::error::ApiError;

/// Settings for [`require_bearer`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSettings {
    /// Request paths served without a token (full path, e.g. `/rest/heart-beat`)
    pub exclude: BTreeSet<String>,
}

impl AuthSettings {
    pub fn new(exclude: BTreeSet<String>) -> Self {
        Self { exclude }
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclude.contains(path)
    }
}

pub async fn require_bearer(
    State(settings): State<Arc<AuthSettings>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if settings.is_excluded(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let has_token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .is_some();
    if has_token {
        return Ok(next.run(request).await);
    }

    tracing::warn!(path = %request.uri().path(), "request without bearer token rejected");
    Err(ApiError::Unauthorized)
}

/// Token part of an `Authorization: Bearer <token>` value, if non-empty
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
