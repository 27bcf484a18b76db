//! Image metadata extraction.

use std::io::Cursor;

use image::ImageReader;
use serde::{Deserialize, Serialize};

/// Dimension string reported when the image header cannot be read.
pub const UNKNOWN_DIMENSIONS: &str = "unknown";

/// Pixel dimensions and byte size of an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
}

impl ImageMetadata {
    /// `"WxH"` as stored on the submission record.
    pub fn dimension_string(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// Sniff dimensions from the encoded header without a full decode.
///
/// An unreadable header or non-positive dimensions are an error; the caller
/// treats that as a metadata failure, which degrades the whole pipeline
/// result rather than crashing it.
pub fn extract_metadata(data: &[u8]) -> anyhow::Result<ImageMetadata> {
    let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    let (width, height) = reader.into_dimensions()?;

    if width == 0 || height == 0 {
        anyhow::bail!("image reports non-positive dimensions: {}x{}", width, height);
    }

    Ok(ImageMetadata {
        width,
        height,
        size_bytes: data.len() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn create_test_image(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);
        img.write_to(&mut cursor, ImageFormat::Png).unwrap();
        buffer
    }

    #[test]
    fn test_extract_metadata() {
        let image_data = create_test_image(1920, 1080);

        let metadata = extract_metadata(&image_data).unwrap();

        assert_eq!(metadata.width, 1920);
        assert_eq!(metadata.height, 1080);
        assert_eq!(metadata.size_bytes, image_data.len() as u64);
        assert_eq!(metadata.dimension_string(), "1920x1080");
    }

    #[test]
    fn test_extract_metadata_invalid_image() {
        let result = extract_metadata(b"not an image");
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_metadata_empty_input() {
        let result = extract_metadata(&[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_metadata_serialization() {
        let metadata = ImageMetadata {
            width: 640,
            height: 480,
            size_bytes: 1024,
        };

        let json = serde_json::to_string(&metadata).unwrap();
        let deserialized: ImageMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(metadata, deserialized);
    }
}
