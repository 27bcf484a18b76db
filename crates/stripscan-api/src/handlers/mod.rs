//! HTTP handlers for the test strip API.

mod health;
mod strip_get;
mod strip_list;
mod strip_upload;

pub use health::*;
pub use strip_get::*;
pub use strip_list::*;
pub use strip_upload::*;
