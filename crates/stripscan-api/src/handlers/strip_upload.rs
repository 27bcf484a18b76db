use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use stripscan_core::models::{NewSubmission, SubmissionResponse};
use stripscan_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

fn bad_multipart(err: MultipartError) -> HttpAppError {
    HttpAppError(AppError::BadRequest(format!(
        "Invalid multipart upload: {}",
        err
    )))
}

/// Upload and process a test strip photo.
///
/// Validates the upload (MIME type, size), stores the original under a
/// unique name, runs the processing pipeline, and persists the resulting
/// submission. A failed classification is not an HTTP error: the record is
/// created with the corresponding status and returned with 201.
#[utoipa::path(
    post,
    path = "/api/test-strips/upload",
    tag = "test-strips",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Submission created", body = SubmissionResponse),
        (status = 400, description = "Missing or invalid image file", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_test_strip"))]
pub async fn upload_test_strip(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<SubmissionResponse>), HttpAppError> {
    let mut file = None;
    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        if field.name() != Some("image") {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let original_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(bad_multipart)?;
        file = Some((content_type, original_name, data));
        break;
    }

    let Some((content_type, original_name, data)) = file else {
        return Err(AppError::BadRequest("No image file provided".to_string()).into());
    };

    if !state
        .config
        .allowed_content_types
        .iter()
        .any(|ct| ct.eq_ignore_ascii_case(&content_type))
    {
        return Err(AppError::InvalidInput(
            "Invalid file type. Only JPG and PNG files are allowed.".to_string(),
        )
        .into());
    }

    if data.len() > state.config.max_upload_size_bytes {
        return Err(AppError::PayloadTooLarge(
            "File size too large. Maximum size is 10MB.".to_string(),
        )
        .into());
    }

    // Store the original under a collision-free name before processing.
    let ext = std::path::Path::new(&original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| {
            if content_type.eq_ignore_ascii_case("image/png") {
                "png".to_string()
            } else {
                "jpg".to_string()
            }
        });
    let stored_filename = format!("{}.{}", Uuid::new_v4(), ext);
    let stored_path = state.upload_dir.join(&stored_filename);
    tokio::fs::write(&stored_path, &data)
        .await
        .map_err(AppError::from)?;

    let outcome = state.pipeline.process(&stored_path).await;

    let submission = state
        .repository
        .create(NewSubmission {
            qr_code: outcome.qr_payload().map(str::to_string),
            original_image_path: stored_filename,
            thumbnail_path: outcome.thumbnail().map(str::to_string),
            image_size: outcome.size_bytes() as i64,
            image_dimensions: outcome.dimension_string(),
            status: outcome.submission_status(),
            error_message: outcome.error_message(),
        })
        .await?;

    tracing::info!(
        submission_id = %submission.id,
        status = ?submission.status,
        size_bytes = submission.image_size,
        "Test strip processed"
    );

    Ok((StatusCode::CREATED, Json(SubmissionResponse::from(submission))))
}
