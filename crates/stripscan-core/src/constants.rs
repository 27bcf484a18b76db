//! Shared constants for the processing pipeline and API defaults.

/// Bounding box (width and height, pixels) for generated thumbnails.
pub const THUMBNAIL_SIZE: u32 = 200;

/// JPEG quality used when encoding thumbnails.
pub const THUMBNAIL_JPEG_QUALITY: u8 = 80;

/// Maximum working width (pixels) for the QR decode pass. Larger images are
/// downscaled to this width before decoding to bound decode cost.
pub const QR_DECODE_MAX_WIDTH: u32 = 800;

/// Fixed prefix token expected in strip QR payloads (`ELI-YYYY-suffix`).
pub const QR_PAYLOAD_PREFIX: &str = "ELI";

/// Maximum accepted upload size in bytes (10 MiB).
pub const MAX_UPLOAD_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Default page size for submission listings.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Hard cap on page size for submission listings.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// URL prefix under which originals and thumbnails are served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";
