use crate::domain::{CompletedBucket, Job, JobId, JobStatus};
use async_trait::async_trait;

use super::RepositoryError;

/// Durable record of bucket-creation jobs, keyed by job id.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Inserts a new row. Fails with `DuplicateId` when the id is taken.
    async fn create(&self, job: &Job) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;

    /// Atomic partial update that also refreshes `updated_at`. Rows in a
    /// terminal state are rejected with `InvalidTransition`.
    async fn update_status(
        &self,
        id: JobId,
        status: JobStatus,
        result_reference: Option<&str>,
        error_detail: Option<&str>,
    ) -> Result<(), RepositoryError>;

    /// Increments the persisted attempt counter, stores the failure message
    /// and returns the new count.
    async fn record_failed_attempt(
        &self,
        id: JobId,
        error_detail: &str,
    ) -> Result<u32, RepositoryError>;

    /// Jobs still `queued` or `processing`, oldest first.
    async fn list_unfinished(&self) -> Result<Vec<Job>, RepositoryError>;

    /// Completed jobs, most recently created first.
    async fn list_completed(&self) -> Result<Vec<CompletedBucket>, RepositoryError>;

    async fn ping(&self) -> Result<(), RepositoryError>;
}
