//! Schema bootstrap.
//!
//! The service owns a single table; the schema is created idempotently at
//! startup rather than through a migration system.

use sqlx::PgPool;
use stripscan_core::AppError;

// Executed over the simple query protocol (raw_sql): the DO block cannot be
// prepared, and the statements must run in order.
const SCHEMA: &str = r#"
DO $$ BEGIN
    CREATE TYPE submission_status AS ENUM (
        'processing',
        'completed',
        'failed',
        'qr_not_found',
        'qr_invalid',
        'qr_expired'
    );
EXCEPTION
    WHEN duplicate_object THEN NULL;
END $$;

CREATE TABLE IF NOT EXISTS test_strip_submissions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    qr_code TEXT,
    original_image_path TEXT NOT NULL,
    thumbnail_path TEXT,
    image_size BIGINT NOT NULL DEFAULT 0,
    image_dimensions TEXT NOT NULL DEFAULT 'unknown',
    status submission_status NOT NULL,
    error_message TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX IF NOT EXISTS idx_test_strip_submissions_created_at
    ON test_strip_submissions (created_at DESC);
"#;

/// Create the submission status enum, table, and listing index if missing.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), AppError> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    tracing::info!("Database schema ensured");
    Ok(())
}
