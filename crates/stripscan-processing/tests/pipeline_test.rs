//! End-to-end pipeline scenarios over synthesized strip photos.

use std::path::Path;

use chrono::{Datelike, Utc};
use image::{GenericImageView, ImageFormat, ImageReader, Rgba, RgbaImage};
use qrcode::{Color, QrCode};
use tempfile::tempdir;

use stripscan_core::models::SubmissionStatus;
use stripscan_processing::{ImagePipeline, ProcessingOutcome};

/// Pixel size of one QR module on the synthesized canvas. Large enough that
/// modules stay several pixels wide after the pipeline's 800px decode
/// downscale.
const MODULE_SIZE: u32 = 16;
/// Quiet zone around the code, in modules.
const QUIET_ZONE: u32 = 4;

/// Paint `payload` as a QR code centered on a white canvas.
fn strip_photo(payload: &str, canvas_width: u32, canvas_height: u32) -> RgbaImage {
    let code = QrCode::new(payload.as_bytes()).expect("payload fits a QR code");
    let modules = code.width() as u32;
    let colors = code.to_colors();

    let mut canvas = RgbaImage::from_pixel(canvas_width, canvas_height, Rgba([255, 255, 255, 255]));

    let code_px = (modules + 2 * QUIET_ZONE) * MODULE_SIZE;
    assert!(
        code_px <= canvas_width && code_px <= canvas_height,
        "canvas too small for QR code"
    );
    let x0 = (canvas_width - code_px) / 2 + QUIET_ZONE * MODULE_SIZE;
    let y0 = (canvas_height - code_px) / 2 + QUIET_ZONE * MODULE_SIZE;

    for (i, color) in colors.iter().enumerate() {
        if *color == Color::Dark {
            let mx = i as u32 % modules;
            let my = i as u32 / modules;
            for dy in 0..MODULE_SIZE {
                for dx in 0..MODULE_SIZE {
                    canvas.put_pixel(
                        x0 + mx * MODULE_SIZE + dx,
                        y0 + my * MODULE_SIZE + dy,
                        Rgba([0, 0, 0, 255]),
                    );
                }
            }
        }
    }

    canvas
}

fn write_png(img: &RgbaImage, path: &Path) {
    img.save_with_format(path, ImageFormat::Png).unwrap();
}

fn thumbnail_dimensions(dir: &Path, filename: &str) -> (u32, u32) {
    let data = std::fs::read(dir.join(filename)).unwrap();
    let img = ImageReader::new(std::io::Cursor::new(data.as_slice()))
        .with_guessed_format()
        .unwrap()
        .decode()
        .unwrap();
    (img.width(), img.height())
}

#[tokio::test]
async fn valid_strip_produces_completed_submission() {
    let dir = tempdir().unwrap();
    let payload = format!("ELI-{}-001", Utc::now().year());
    let path = dir.path().join("upload.png");
    write_png(&strip_photo(&payload, 1920, 1080), &path);

    let pipeline = ImagePipeline::new(dir.path());
    let outcome = pipeline.process(&path).await;

    assert_eq!(outcome.dimension_string(), "1920x1080");
    assert!(outcome.size_bytes() > 0);
    assert_eq!(outcome.qr_payload(), Some(payload.as_str()));
    assert_eq!(outcome.submission_status(), SubmissionStatus::Completed);
    assert!(outcome.error_message().is_none());

    let thumbnail = outcome.thumbnail().expect("thumbnail generated");
    let (w, h) = thumbnail_dimensions(dir.path(), thumbnail);
    assert!(w <= 200 && h <= 200);
}

#[tokio::test]
async fn expired_strip_is_flagged() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("upload.png");
    write_png(&strip_photo("ELI-2020-001", 1280, 1280), &path);

    let pipeline = ImagePipeline::new(dir.path());
    let outcome = pipeline.process(&path).await;

    assert_eq!(outcome.qr_payload(), Some("ELI-2020-001"));
    assert_eq!(outcome.submission_status(), SubmissionStatus::QrExpired);
    assert_eq!(outcome.error_message().as_deref(), Some("Test strip expired"));
}

#[tokio::test]
async fn photo_without_code_reports_not_found() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("upload.png");
    let blank = RgbaImage::from_pixel(1024, 768, Rgba([255, 255, 255, 255]));
    write_png(&blank, &path);

    let pipeline = ImagePipeline::new(dir.path());
    let outcome = pipeline.process(&path).await;

    assert_eq!(outcome.qr_payload(), None);
    assert_eq!(outcome.submission_status(), SubmissionStatus::QrNotFound);
    assert_eq!(outcome.error_message().as_deref(), Some("QR code not found"));
    // Thumbnail generation is independent of the QR outcome
    assert!(outcome.thumbnail().is_some());
}

#[tokio::test]
async fn unknown_payload_is_invalid_but_retained() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("upload.png");
    write_png(&strip_photo("NOT-A-CODE", 1280, 1280), &path);

    let pipeline = ImagePipeline::new(dir.path());
    let outcome = pipeline.process(&path).await;

    assert_eq!(outcome.qr_payload(), Some("NOT-A-CODE"));
    assert_eq!(outcome.submission_status(), SubmissionStatus::QrInvalid);
    assert_eq!(
        outcome.error_message().as_deref(),
        Some("Unknown QR code format")
    );
}

#[tokio::test]
async fn unreadable_file_degrades_to_failed_sentinel() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("upload.jpg");
    tokio::fs::write(&path, b"").await.unwrap();

    let pipeline = ImagePipeline::new(dir.path());
    let outcome = pipeline.process(&path).await;

    assert!(matches!(outcome, ProcessingOutcome::Failed));
    assert_eq!(outcome.dimension_string(), "unknown");
    assert_eq!(outcome.size_bytes(), 0);
    assert!(outcome.thumbnail().is_none());
    assert_eq!(outcome.submission_status(), SubmissionStatus::Failed);
    // No thumbnail may be written for a degraded result
    let thumbs = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("thumb_"))
        .count();
    assert_eq!(thumbs, 0);
}

#[tokio::test]
async fn thumbnail_failure_does_not_affect_qr_classification() {
    let dir = tempdir().unwrap();
    let payload = format!("ELI-{}-007", Utc::now().year());
    let path = dir.path().join("upload.png");
    write_png(&strip_photo(&payload, 1280, 1280), &path);

    // Point the pipeline at a directory that does not exist so the
    // thumbnail write fails while decoding still succeeds.
    let pipeline = ImagePipeline::new(dir.path().join("missing"));
    let outcome = pipeline.process(&path).await;

    assert!(outcome.thumbnail().is_none());
    assert_eq!(outcome.qr_payload(), Some(payload.as_str()));
    assert_eq!(outcome.submission_status(), SubmissionStatus::Completed);
}

#[tokio::test]
async fn concurrent_uploads_never_collide_on_thumbnail_names() {
    let dir = tempdir().unwrap();
    let payload = format!("ELI-{}-001", Utc::now().year());
    let path = dir.path().join("upload.png");
    write_png(&strip_photo(&payload, 1280, 1280), &path);

    let pipeline = ImagePipeline::new(dir.path());
    let mut tasks = Vec::new();
    for _ in 0..8 {
        let pipeline = pipeline.clone();
        let path = path.clone();
        tasks.push(tokio::spawn(async move { pipeline.process(&path).await }));
    }

    let mut names = std::collections::HashSet::new();
    for task in tasks {
        let outcome = task.await.unwrap();
        let name = outcome.thumbnail().expect("thumbnail generated").to_string();
        assert!(names.insert(name), "duplicate thumbnail filename");
    }
    assert_eq!(names.len(), 8);
}
