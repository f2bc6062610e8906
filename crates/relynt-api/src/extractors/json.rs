//! Deferred JSON extractor
//!
//! Parses a JSON body without rejecting the request, so handlers can check
//! the caller's identity before reporting a malformed body.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::response::{ApiError, ApiResult};

/// A JSON body whose parse error is surfaced on demand
#[derive(Debug)]
pub struct DeferredJson<T>(ApiResult<T>);

impl<T> DeferredJson<T> {
    /// The parsed body, or a `VALIDATION_ERROR` describing why it did not parse
    pub fn into_inner(self) -> ApiResult<T> {
        self.0
    }
}

#[async_trait]
impl<S, T> FromRequest<S> for DeferredJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let parsed = Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| value)
            .map_err(rejection_to_error);
        Ok(DeferredJson(parsed))
    }
}

fn rejection_to_error(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(e) => ApiError::invalid_body(e.body_text()),
        JsonRejection::JsonSyntaxError(e) => ApiError::invalid_body(e.body_text()),
        JsonRejection::MissingJsonContentType(e) => ApiError::invalid_body(e.body_text()),
        JsonRejection::BytesRejection(e) => ApiError::invalid_body(e.body_text()),
        _ => ApiError::invalid_body("Invalid JSON body"),
    }
}
