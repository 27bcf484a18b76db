//! The image processing pipeline.
//!
//! One invocation per upload: metadata sniff, then thumbnail generation and
//! QR classification as independent branches over the same buffer. The
//! pipeline never returns an error — a metadata failure degrades the whole
//! result to the failed sentinel, and a failure in either branch degrades
//! only that branch's field.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Datelike, Utc};

use stripscan_core::models::SubmissionStatus;

use crate::metadata::{self, ImageMetadata, UNKNOWN_DIMENSIONS};
use crate::qr::{self, QrCodeResult, QrStatus};
use crate::thumbnail;

/// Result of one pipeline invocation.
///
/// Callers pattern-match instead of probing optional fields: `Failed` is the
/// degraded sentinel (unknown dimensions, zero size, no thumbnail, no QR
/// result), `Processed` carries whatever the branches produced.
#[derive(Debug)]
pub enum ProcessingOutcome {
    Processed {
        metadata: ImageMetadata,
        /// Thumbnail filename within the upload directory, when generation
        /// succeeded.
        thumbnail: Option<String>,
        qr: QrCodeResult,
    },
    Failed,
}

impl ProcessingOutcome {
    /// `"WxH"` or `"unknown"`.
    pub fn dimension_string(&self) -> String {
        match self {
            ProcessingOutcome::Processed { metadata, .. } => metadata.dimension_string(),
            ProcessingOutcome::Failed => UNKNOWN_DIMENSIONS.to_string(),
        }
    }

    pub fn size_bytes(&self) -> u64 {
        match self {
            ProcessingOutcome::Processed { metadata, .. } => metadata.size_bytes,
            ProcessingOutcome::Failed => 0,
        }
    }

    pub fn thumbnail(&self) -> Option<&str> {
        match self {
            ProcessingOutcome::Processed { thumbnail, .. } => thumbnail.as_deref(),
            ProcessingOutcome::Failed => None,
        }
    }

    pub fn qr_payload(&self) -> Option<&str> {
        match self {
            ProcessingOutcome::Processed { qr, .. } => qr.payload.as_deref(),
            ProcessingOutcome::Failed => None,
        }
    }

    /// Map the outcome onto the stored submission status. Pure function; a
    /// pipeline-level failure overrides any QR result.
    pub fn submission_status(&self) -> SubmissionStatus {
        match self {
            ProcessingOutcome::Failed => SubmissionStatus::Failed,
            ProcessingOutcome::Processed { qr, .. } => match qr.status {
                QrStatus::NotFound => SubmissionStatus::QrNotFound,
                QrStatus::Invalid => SubmissionStatus::QrInvalid,
                QrStatus::Expired => SubmissionStatus::QrExpired,
                QrStatus::Valid => SubmissionStatus::Completed,
            },
        }
    }

    /// Human-readable message accompanying a non-completed status.
    pub fn error_message(&self) -> Option<String> {
        match self {
            ProcessingOutcome::Failed => Some("Image processing failed".to_string()),
            ProcessingOutcome::Processed { qr, .. } => qr.message.clone(),
        }
    }
}

/// The image ingestion pipeline. Holds the shared upload directory that
/// receives generated thumbnails.
#[derive(Clone, Debug)]
pub struct ImagePipeline {
    upload_dir: PathBuf,
}

impl ImagePipeline {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        ImagePipeline {
            upload_dir: upload_dir.into(),
        }
    }

    /// Process an uploaded image file. Never fails; see [`ProcessingOutcome`].
    pub async fn process(&self, path: &Path) -> ProcessingOutcome {
        let data = match tokio::fs::read(path).await {
            Ok(data) => data,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Failed to read uploaded image");
                return ProcessingOutcome::Failed;
            }
        };

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string();

        self.process_bytes(data, &ext).await
    }

    /// Process raw image bytes. `source_ext` is the original upload's
    /// extension (without dot), carried into the thumbnail filename.
    pub async fn process_bytes(&self, data: Vec<u8>, source_ext: &str) -> ProcessingOutcome {
        let start = std::time::Instant::now();

        // A metadata failure aborts the remaining stages entirely: the whole
        // result becomes the degraded sentinel rather than attempting
        // thumbnail or QR work on bad input.
        let metadata = match metadata::extract_metadata(&data) {
            Ok(metadata) => metadata,
            Err(err) => {
                tracing::warn!(error = %err, "Metadata extraction failed, degrading result");
                return ProcessingOutcome::Failed;
            }
        };

        // Both branches only read the original buffer; run them off the
        // async pool. Failure in one must not cancel or corrupt the other.
        let data = Arc::new(data);

        let thumb_task = {
            let data = Arc::clone(&data);
            let upload_dir = self.upload_dir.clone();
            let ext = source_ext.to_string();
            tokio::task::spawn_blocking(move || {
                thumbnail::generate_thumbnail(&data, &upload_dir, &ext)
            })
        };

        let qr_task = {
            let data = Arc::clone(&data);
            let current_year = Utc::now().year();
            tokio::task::spawn_blocking(move || qr::decode_and_classify(&data, current_year))
        };

        let (thumb_result, qr_result) = tokio::join!(thumb_task, qr_task);

        let thumbnail = match thumb_result {
            Ok(Ok(filename)) => Some(filename),
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "Thumbnail generation failed");
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "Thumbnail task aborted");
                None
            }
        };

        let qr = match qr_result {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(error = %err, "QR task aborted");
                QrCodeResult {
                    payload: None,
                    status: QrStatus::Invalid,
                    message: Some("Error processing QR code".to_string()),
                }
            }
        };

        tracing::debug!(
            dimensions = %metadata.dimension_string(),
            size_bytes = metadata.size_bytes,
            thumbnail = ?thumbnail,
            qr_status = ?qr.status,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image processed"
        );

        ProcessingOutcome::Processed {
            metadata,
            thumbnail,
            qr,
        }
    }
}
