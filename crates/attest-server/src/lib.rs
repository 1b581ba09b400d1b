//! # attest-server
//!
//! axum HTTP API over [`attest_db::service::AttestService`].
//!
//! Callers are identified by a request header carrying a user id, asserted by
//! an upstream proxy. See [`extract`] for how it is resolved.

pub mod app;
pub mod cli;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod params;

pub use app::{AppState, router};
pub use error::ApiError;
