//! QR decode and strip classification.
//!
//! Payloads follow the grammar `ELI-YYYY-suffix`, where `YYYY` encodes the
//! strip batch's validity year. Expiry is evaluated against the wall-clock
//! year at processing time, so a stored strip is re-judged on every
//! processing pass rather than frozen at capture time.

use std::io::Cursor;
use std::sync::LazyLock;

use image::imageops::FilterType;
use image::{GenericImageView, ImageReader};
use regex::Regex;

use stripscan_core::constants::QR_DECODE_MAX_WIDTH;

static PAYLOAD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ELI-(\d{4})-[A-Za-z0-9]+$").expect("valid payload pattern"));

/// Classification outcome of the QR stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QrStatus {
    NotFound,
    Invalid,
    Valid,
    Expired,
}

/// Decoded payload plus classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrCodeResult {
    pub payload: Option<String>,
    pub status: QrStatus,
    pub message: Option<String>,
}

impl QrCodeResult {
    fn not_found() -> Self {
        QrCodeResult {
            payload: None,
            status: QrStatus::NotFound,
            message: Some("QR code not found".to_string()),
        }
    }

    fn processing_error() -> Self {
        QrCodeResult {
            payload: None,
            status: QrStatus::Invalid,
            message: Some("Error processing QR code".to_string()),
        }
    }
}

/// Classify a decoded payload against the strip grammar.
///
/// Pure function of the payload and the comparison year, so callers (and
/// tests) control the clock.
pub fn classify_payload(payload: &str, current_year: i32) -> QrCodeResult {
    let Some(caps) = PAYLOAD_PATTERN.captures(payload) else {
        return QrCodeResult {
            payload: Some(payload.to_string()),
            status: QrStatus::Invalid,
            message: Some("Unknown QR code format".to_string()),
        };
    };

    // Four digits always parse
    let year: i32 = caps[1].parse().unwrap_or(0);

    if year < current_year {
        QrCodeResult {
            payload: Some(payload.to_string()),
            status: QrStatus::Expired,
            message: Some("Test strip expired".to_string()),
        }
    } else {
        QrCodeResult {
            payload: Some(payload.to_string()),
            status: QrStatus::Valid,
            message: None,
        }
    }
}

/// Run a QR decode pass over the encoded image data.
///
/// The working copy is downscaled to a bounded width (never enlarged) and
/// converted to grayscale before decoding. Returns `Ok(None)` when no code
/// is located in the frame.
fn decode_payload(data: &[u8]) -> anyhow::Result<Option<String>> {
    let img = ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .decode()?;

    let (width, height) = img.dimensions();
    let img = if width > QR_DECODE_MAX_WIDTH {
        let aspect_ratio = height as f32 / width as f32;
        let new_height = ((QR_DECODE_MAX_WIDTH as f32 * aspect_ratio).round() as u32).max(1);
        img.resize_exact(QR_DECODE_MAX_WIDTH, new_height, FilterType::Triangle)
    } else {
        img
    };

    let gray = img.to_luma8();
    let (w, h) = gray.dimensions();
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(w as usize, h as usize, |x, y| {
        gray.get_pixel(x as u32, y as u32).0[0]
    });

    let grids = prepared.detect_grids();
    match grids.first() {
        None => Ok(None),
        Some(grid) => {
            let (_meta, content) = grid.decode()?;
            Ok(Some(content))
        }
    }
}

/// Decode a QR code from the image and classify its payload.
///
/// Never fails: decode errors are reported as an `Invalid` result carrying
/// a generic message, per the pipeline's degrade-to-value contract.
pub fn decode_and_classify(data: &[u8], current_year: i32) -> QrCodeResult {
    match decode_payload(data) {
        Ok(Some(payload)) => classify_payload(&payload, current_year),
        Ok(None) => QrCodeResult::not_found(),
        Err(err) => {
            tracing::debug!(error = %err, "QR decode pass failed");
            QrCodeResult::processing_error()
        }
    }
}
