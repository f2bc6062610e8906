//! Session extractor
//!
//! Resolves the caller's identity from an optional bearer token.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use relynt_common::BearerSession;

use crate::state::AppState;

/// The caller's session
///
/// Never rejects: a missing or invalid token yields an anonymous session, and
/// the services answer `UNAUTHORIZED` before looking at anything else.
#[derive(Debug, Clone)]
pub struct Session(pub BearerSession);

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|TypedHeader(Authorization(bearer))| bearer.token().to_owned());

        let app_state = AppState::from_ref(state);
        Ok(Session(BearerSession::from_token(
            app_state.jwt_service(),
            token.as_deref(),
        )))
    }
}
