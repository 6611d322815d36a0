use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{BucketName, CompletedBucket, Job, JobId, JobStatus};

pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Explains why a guarded write touched no row.
    async fn rejected_write(&self, id: JobId, to: JobStatus) -> RepositoryError {
        let current = sqlx::query("SELECT status FROM bucket_jobs WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await;

        match current {
            Ok(Some(row)) => match row
                .try_get::<String, _>("status")
                .map_err(|e| e.to_string())
                .and_then(|s| s.parse::<JobStatus>())
            {
                Ok(from) => RepositoryError::InvalidTransition {
                    id: id.to_string(),
                    from,
                    to,
                },
                Err(e) => RepositoryError::QueryFailed(e),
            },
            Ok(None) => RepositoryError::NotFound(id.to_string()),
            Err(e) => RepositoryError::QueryFailed(e.to_string()),
        }
    }
}

fn job_from_row(row: &PgRow) -> Result<Job, RepositoryError> {
    let query_failed = |e: sqlx::Error| RepositoryError::QueryFailed(e.to_string());

    let status = row
        .try_get::<String, _>("status")
        .map_err(query_failed)?
        .parse::<JobStatus>()
        .map_err(RepositoryError::QueryFailed)?;
    let attempts: i32 = row.try_get("attempts").map_err(query_failed)?;

    Ok(Job {
        id: JobId::from_uuid(row.try_get::<Uuid, _>("id").map_err(query_failed)?),
        bucket_name: BucketName::from_trusted(
            row.try_get::<String, _>("bucket_name")
                .map_err(query_failed)?,
        ),
        status,
        result_reference: row.try_get("tx_hash").map_err(query_failed)?,
        error_detail: row.try_get("error").map_err(query_failed)?,
        attempts: attempts.max(0) as u32,
        last_error: row.try_get("last_error").map_err(query_failed)?,
        created_at: row.try_get("created_at").map_err(query_failed)?,
        updated_at: row.try_get("updated_at").map_err(query_failed)?,
    })
}

#[async_trait]
impl JobRepository for PgJobRepository {
    #[instrument(skip(self, job), fields(job_id = %job.id))]
    async fn create(&self, job: &Job) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO bucket_jobs (id, bucket_name, status, tx_hash, error, attempts, last_error, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(job.id.as_uuid())
        .bind(job.bucket_name.as_str())
        .bind(job.status.as_str())
        .bind(job.result_reference.as_deref())
        .bind(job.error_detail.as_deref())
        .bind(job.attempts as i32)
        .bind(job.last_error.as_deref())
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => RepositoryError::DuplicateId(job.id.to_string()),
            _ => RepositoryError::QueryFailed(e.to_string()),
        })?;

        Ok(())
    }

    #[instrument(skip(self), fields(job_id = %id))]
    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, bucket_name, status, tx_hash, error, attempts, last_error, created_at, updated_at
            FROM bucket_jobs
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.as_ref().map(job_from_row).transpose()
    }

    #[instrument(skip(self, result_reference, error_detail), fields(job_id = %id, status = %status))]
    async fn update_status(
        &self,
        id: JobId,
        status: JobStatus,
        result_reference: Option<&str>,
        error_detail: Option<&str>,
    ) -> Result<(), RepositoryError> {
        if status == JobStatus::Queued {
            return Err(self.rejected_write(id, status).await);
        }

        let tx_hash = result_reference.filter(|_| status == JobStatus::Completed);
        let error = error_detail.filter(|_| status == JobStatus::Failed);
        let now: DateTime<Utc> = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE bucket_jobs
            SET status = $1, tx_hash = $2, error = $3, updated_at = $4
            WHERE id = $5 AND status NOT IN ('completed', 'failed')
            "#,
        )
        .bind(status.as_str())
        .bind(tx_hash)
        .bind(error)
        .bind(now)
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(self.rejected_write(id, status).await);
        }

        Ok(())
    }

    #[instrument(skip(self, error_detail), fields(job_id = %id))]
    async fn record_failed_attempt(
        &self,
        id: JobId,
        error_detail: &str,
    ) -> Result<u32, RepositoryError> {
        let row = sqlx::query(
            r#"
            UPDATE bucket_jobs
            SET attempts = attempts + 1, last_error = $1, updated_at = $2
            WHERE id = $3 AND status NOT IN ('completed', 'failed')
            RETURNING attempts
            "#,
        )
        .bind(error_detail)
        .bind(Utc::now())
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        match row {
            Some(row) => {
                let attempts: i32 = row
                    .try_get("attempts")
                    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
                Ok(attempts.max(0) as u32)
            }
            None => Err(self.rejected_write(id, JobStatus::Processing).await),
        }
    }

    #[instrument(skip(self))]
    async fn list_unfinished(&self) -> Result<Vec<Job>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, bucket_name, status, tx_hash, error, attempts, last_error, created_at, updated_at
            FROM bucket_jobs
            WHERE status IN ('queued', 'processing')
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.iter().map(job_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn list_completed(&self) -> Result<Vec<CompletedBucket>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT bucket_name, tx_hash, created_at
            FROM bucket_jobs
            WHERE status = 'completed'
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.iter()
            .map(|r| {
                let query_failed = |e: sqlx::Error| RepositoryError::QueryFailed(e.to_string());
                Ok(CompletedBucket {
                    bucket_name: BucketName::from_trusted(
                        r.try_get::<String, _>("bucket_name")
                            .map_err(query_failed)?,
                    ),
                    result_reference: r.try_get("tx_hash").map_err(query_failed)?,
                    created_at: r.try_get("created_at").map_err(query_failed)?,
                })
            })
            .collect()
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;
        Ok(())
    }
}
