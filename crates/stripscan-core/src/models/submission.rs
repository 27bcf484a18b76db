//! Test strip submission records and their API response shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::constants::UPLOADS_URL_PREFIX;

/// Outcome status of a submission. Stored in PostgreSQL as the
/// `submission_status` enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "submission_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Record created, pipeline still running. Not produced by the current
    /// synchronous upload flow but kept for forward compatibility with
    /// deferred processing.
    Processing,
    /// Strip identified and within its validity year.
    Completed,
    /// The image could not be processed at all.
    Failed,
    QrNotFound,
    QrInvalid,
    QrExpired,
}

/// A persisted test strip submission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Submission {
    pub id: Uuid,
    pub qr_code: Option<String>,
    /// Filename of the stored original within the upload directory.
    pub original_image_path: String,
    /// Filename of the generated thumbnail, when generation succeeded.
    pub thumbnail_path: Option<String>,
    pub image_size: i64,
    /// `"WxH"`, or `"unknown"` when dimensions could not be determined.
    pub image_dimensions: String,
    pub status: SubmissionStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new submission (id and created_at are assigned by
/// the database).
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub qr_code: Option<String>,
    pub original_image_path: String,
    pub thumbnail_path: Option<String>,
    pub image_size: i64,
    pub image_dimensions: String,
    pub status: SubmissionStatus,
    pub error_message: Option<String>,
}

fn upload_url(filename: &str) -> String {
    format!("{}/{}", UPLOADS_URL_PREFIX, filename)
}

/// Detail/upload response: the stored record plus derived URLs.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionResponse {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    pub image_size: i64,
    pub image_dimensions: String,
    pub status: SubmissionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub original_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Submission> for SubmissionResponse {
    fn from(s: Submission) -> Self {
        SubmissionResponse {
            id: s.id,
            qr_code: s.qr_code,
            image_size: s.image_size,
            image_dimensions: s.image_dimensions,
            status: s.status,
            error_message: s.error_message,
            original_url: upload_url(&s.original_image_path),
            thumbnail_url: s.thumbnail_path.as_deref().map(upload_url),
            created_at: s.created_at,
        }
    }
}

/// Compact list-view item for the history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionListItem {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    pub status: SubmissionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Submission> for SubmissionListItem {
    fn from(s: Submission) -> Self {
        SubmissionListItem {
            id: s.id,
            qr_code: s.qr_code,
            status: s.status,
            error_message: s.error_message,
            thumbnail_url: s.thumbnail_path.as_deref().map(upload_url),
            created_at: s.created_at,
        }
    }
}
