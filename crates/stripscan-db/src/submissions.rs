//! Submission repository.

use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use stripscan_core::models::{NewSubmission, PageParams, Paginated, Submission};
use stripscan_core::AppError;

/// Repository for test strip submission records.
#[derive(Clone)]
pub struct SubmissionRepository {
    pool: PgPool,
}

impl SubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(
        skip(self, submission),
        fields(db.table = "test_strip_submissions", db.operation = "insert")
    )]
    pub async fn create(&self, submission: NewSubmission) -> Result<Submission, AppError> {
        let row = sqlx::query_as::<Postgres, Submission>(
            r#"
            INSERT INTO test_strip_submissions
                (qr_code, original_image_path, thumbnail_path, image_size, image_dimensions, status, error_message)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(submission.qr_code)
        .bind(submission.original_image_path)
        .bind(submission.thumbnail_path)
        .bind(submission.image_size)
        .bind(submission.image_dimensions)
        .bind(submission.status)
        .bind(submission.error_message)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    #[tracing::instrument(
        skip(self),
        fields(db.table = "test_strip_submissions", db.operation = "select")
    )]
    pub async fn get(&self, id: Uuid) -> Result<Option<Submission>, AppError> {
        let row = sqlx::query_as::<Postgres, Submission>(
            "SELECT * FROM test_strip_submissions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    #[tracing::instrument(
        skip(self),
        fields(db.table = "test_strip_submissions", db.operation = "select")
    )]
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Submission>, AppError> {
        let rows = sqlx::query_as::<Postgres, Submission>(
            "SELECT * FROM test_strip_submissions ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[tracing::instrument(
        skip(self),
        fields(db.table = "test_strip_submissions", db.operation = "select")
    )]
    pub async fn count(&self) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM test_strip_submissions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Fetch one page of submissions, newest first, with pagination
    /// accounting.
    pub async fn list_page(&self, params: PageParams) -> Result<Paginated<Submission>, AppError> {
        let total = self.count().await?;
        let rows = self.list(params.limit, params.offset()).await?;
        Ok(Paginated::new(rows, params, total))
    }
}
