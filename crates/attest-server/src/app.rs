//! Shared application state and the route table.

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderName;
use axum::routing::{get, put};

use attest_db::service::AttestService;

use crate::handlers::{acceptance_tests, executions, health};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AttestService>,
    /// Header carrying the upstream-asserted user id.
    pub caller_header: HeaderName,
}

impl AppState {
    #[must_use]
    pub fn new(service: AttestService, caller_header: HeaderName) -> Self {
        Self {
            service: Arc::new(service),
            caller_header,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/acceptance-tests",
            get(acceptance_tests::list).post(acceptance_tests::create),
        )
        .route("/acceptance-tests/keywords", get(acceptance_tests::keywords))
        .route(
            "/acceptance-tests/organizations",
            get(acceptance_tests::organizations),
        )
        .route(
            "/acceptance-tests/{id}",
            get(acceptance_tests::show)
                .put(acceptance_tests::update)
                .delete(acceptance_tests::remove),
        )
        .route(
            "/acceptance-tests/{id}/validation",
            put(acceptance_tests::update_validation),
        )
        .route(
            "/acceptance-tests/{id}/timeline",
            get(acceptance_tests::timeline),
        )
        .route(
            "/acceptance-tests/{id}/executions",
            get(executions::list).post(executions::create),
        )
        .with_state(state)
}
