//! Execution routes, nested under an acceptance test.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use attest_core::responses::ExecutionSummary;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extract::{RequireCaller, ResolvedTest};

pub async fn list(
    State(state): State<AppState>,
    resolved: ResolvedTest,
) -> Result<Json<Vec<ExecutionSummary>>, ApiError> {
    Ok(Json(
        state.service.list_executions(&resolved.test.test.id).await?,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    RequireCaller(caller): RequireCaller,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ExecutionSummary>), ApiError> {
    let execution = state.service.execute_acceptance_test(&caller, &id).await?;
    Ok((StatusCode::CREATED, Json(ExecutionSummary::from(&execution))))
}
