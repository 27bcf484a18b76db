//! Thumbnail generation.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader};
use uuid::Uuid;

use stripscan_core::constants::{THUMBNAIL_JPEG_QUALITY, THUMBNAIL_SIZE};

use crate::orientation;

/// Select filter type based on how aggressively the image is downscaled.
fn select_filter(orig_width: u32, orig_height: u32, new_width: u32, new_height: u32) -> FilterType {
    let width_ratio = orig_width as f32 / new_width as f32;
    let height_ratio = orig_height as f32 / new_height as f32;
    let max_ratio = width_ratio.max(height_ratio);

    if max_ratio > 2.0 {
        FilterType::Triangle
    } else if max_ratio > 1.5 {
        FilterType::CatmullRom
    } else {
        FilterType::Lanczos3
    }
}

/// Generate a thumbnail for the given encoded image and write it into the
/// upload directory.
///
/// The image is orientation-corrected, scaled to fit within the thumbnail
/// bounding box (never enlarged), and re-encoded as JPEG. The stored
/// filename keeps the original upload's extension and embeds a UUID so
/// concurrent invocations never collide. Returns the filename relative to
/// the upload directory.
pub fn generate_thumbnail(
    data: &[u8],
    upload_dir: &Path,
    source_ext: &str,
) -> anyhow::Result<String> {
    let start = std::time::Instant::now();

    let img = ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .decode()?;
    let img = orientation::apply_orientation(img, data);

    let (width, height) = img.dimensions();
    let img = if width > THUMBNAIL_SIZE || height > THUMBNAIL_SIZE {
        let filter = select_filter(width, height, THUMBNAIL_SIZE, THUMBNAIL_SIZE);
        img.resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, filter)
    } else {
        // Already fits the bounding box; never enlarge
        img
    };

    let ext = source_ext.trim_start_matches('.');
    let ext = if ext.is_empty() { "jpg" } else { ext };
    let filename = format!("thumb_{}.{}", Uuid::new_v4(), ext);
    let path = upload_dir.join(&filename);

    let mut encoded = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut encoded, THUMBNAIL_JPEG_QUALITY);
    // JPEG has no alpha channel
    DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)?;
    std::fs::write(&path, &encoded)?;

    tracing::debug!(
        path = %path.display(),
        size_bytes = encoded.len(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Thumbnail written"
    );

    Ok(filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use tempfile::tempdir;

    fn create_test_image(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png).unwrap();
        buffer
    }

    fn thumbnail_dimensions(dir: &Path, filename: &str) -> (u32, u32) {
        let data = std::fs::read(dir.join(filename)).unwrap();
        let img = ImageReader::new(Cursor::new(data.as_slice()))
            .with_guessed_format()
            .unwrap()
            .decode()
            .unwrap();
        img.dimensions()
    }

    #[test]
    fn test_thumbnail_fits_bounding_box() {
        let dir = tempdir().unwrap();
        let data = create_test_image(1920, 1080);

        let filename = generate_thumbnail(&data, dir.path(), "png").unwrap();
        assert!(filename.starts_with("thumb_"));
        assert!(filename.ends_with(".png"));

        let (w, h) = thumbnail_dimensions(dir.path(), &filename);
        assert!(w <= THUMBNAIL_SIZE && h <= THUMBNAIL_SIZE);
        // Aspect ratio preserved: 1920x1080 -> 200x112 (16:9)
        assert_eq!(w, 200);
        assert_eq!(h, 112);
    }

    #[test]
    fn test_thumbnail_never_enlarges() {
        let dir = tempdir().unwrap();
        let data = create_test_image(50, 80);

        let filename = generate_thumbnail(&data, dir.path(), "png").unwrap();
        let (w, h) = thumbnail_dimensions(dir.path(), &filename);
        assert_eq!((w, h), (50, 80));
    }

    #[test]
    fn test_thumbnail_output_is_jpeg() {
        let dir = tempdir().unwrap();
        let data = create_test_image(400, 400);

        let filename = generate_thumbnail(&data, dir.path(), "png").unwrap();
        let bytes = std::fs::read(dir.path().join(&filename)).unwrap();
        // JPEG SOI marker, regardless of the filename extension
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_thumbnail_defaults_extension() {
        let dir = tempdir().unwrap();
        let data = create_test_image(10, 10);

        let filename = generate_thumbnail(&data, dir.path(), "").unwrap();
        assert!(filename.ends_with(".jpg"));
    }

    #[test]
    fn test_thumbnail_rejects_unreadable_input() {
        let dir = tempdir().unwrap();
        assert!(generate_thumbnail(b"not an image", dir.path(), "png").is_err());
    }

    #[test]
    fn test_thumbnail_filenames_are_unique() {
        let dir = tempdir().unwrap();
        let data = create_test_image(100, 100);

        let a = generate_thumbnail(&data, dir.path(), "png").unwrap();
        let b = generate_thumbnail(&data, dir.path(), "png").unwrap();
        assert_ne!(a, b);
    }
}
