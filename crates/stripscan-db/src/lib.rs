//! Stripscan persistence layer: the submission repository over PostgreSQL.

mod schema;
mod submissions;

pub use schema::ensure_schema;
pub use submissions::SubmissionRepository;
