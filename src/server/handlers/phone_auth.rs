use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::instrument;

use crate::domain::models::{PrepareRequest, PreparedAuth, ProcessRequest, ProcessResponse};
use crate::server::{AppState, errors::AppError};

/// `POST /phone-auth/prepare`
#[instrument(skip_all)]
pub async fn prepare_handler(
    State(state): State<AppState>,
    payload: Result<Json<PrepareRequest>, JsonRejection>,
) -> Result<Json<PreparedAuth>, AppError> {
    let Json(request) = payload?;
    let prepared = state
        .service
        .prepare(request)
        .await
        .map_err(|e| state.error(e))?;
    Ok(Json(prepared))
}

/// `POST /phone-auth/process`
#[instrument(skip_all)]
pub async fn process_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<ProcessResponse>, AppError> {
    let Json(request) = payload?;
    let processed = state
        .service
        .process(request)
        .await
        .map_err(|e| state.error(e))?;
    Ok(Json(processed))
}
