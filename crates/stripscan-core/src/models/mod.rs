//! Data models for the application
//!
//! Submission records and their API response shapes, plus the pagination
//! envelope used by list endpoints.

mod pagination;
mod submission;

pub use pagination::*;
pub use submission::*;
