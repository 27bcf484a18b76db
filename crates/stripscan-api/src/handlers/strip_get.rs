use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use stripscan_core::models::SubmissionResponse;
use stripscan_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Fetch one submission by id.
#[utoipa::path(
    get,
    path = "/api/test-strips/{id}",
    tag = "test-strips",
    params(("id" = Uuid, Path, description = "Submission id")),
    responses(
        (status = 200, description = "Submission detail", body = SubmissionResponse),
        (status = 400, description = "Invalid id format", body = ErrorResponse),
        (status = 404, description = "Submission not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "get_test_strip"))]
pub async fn get_test_strip(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SubmissionResponse>, HttpAppError> {
    // Parse by hand so a malformed id is a 400 with our error shape
    let id = Uuid::parse_str(&id)
        .map_err(|_| AppError::InvalidInput("Invalid ID format".to_string()))?;

    let submission = state
        .repository
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Test strip submission not found".to_string()))?;

    Ok(Json(SubmissionResponse::from(submission)))
}
