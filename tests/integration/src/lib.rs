//! Integration test utilities for the Relynt API
//!
//! Spawns the real server on an ephemeral port with the in-memory store and
//! drives it over HTTP.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
