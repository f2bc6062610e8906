//! Axum extractors for request handling
//!
//! Custom extractors for the caller session, JSON bodies and query strings.

mod json;
mod query;
mod session;

pub use json::DeferredJson;
pub use query::QueryParams;
pub use session::Session;
