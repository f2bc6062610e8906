//! # relynt-api
//!
//! REST API server for the audit log, built with Axum.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{bind, build_risk_rules, create_app, create_app_state, run, run_server};
pub use state::AppState;
