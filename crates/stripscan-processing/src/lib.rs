//! Stripscan Processing Library
//!
//! This crate implements the image ingestion pipeline: metadata extraction,
//! thumbnail generation, and QR decode + classification for uploaded test
//! strip photos. The pipeline never fails — every internal error degrades
//! into a field of the returned [`ProcessingOutcome`], because the HTTP
//! caller must always be able to persist a record and respond.

pub mod metadata;
pub mod orientation;
pub mod pipeline;
pub mod qr;
pub mod thumbnail;

// Re-export commonly used types
pub use metadata::{extract_metadata, ImageMetadata, UNKNOWN_DIMENSIONS};
pub use pipeline::{ImagePipeline, ProcessingOutcome};
pub use qr::{classify_payload, decode_and_classify, QrCodeResult, QrStatus};
pub use thumbnail::generate_thumbnail;
