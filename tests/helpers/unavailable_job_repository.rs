use async_trait::async_trait;

use bucketlink::application::ports::{JobRepository, RepositoryError};
use bucketlink::domain::{CompletedBucket, Job, JobId, JobStatus};

/// Job store whose database is unreachable.
pub struct UnavailableJobRepository;

fn down() -> RepositoryError {
    RepositoryError::ConnectionFailed("connection refused".to_string())
}

#[async_trait]
impl JobRepository for UnavailableJobRepository {
    async fn create(&self, _job: &Job) -> Result<(), RepositoryError> {
        Err(down())
    }

    async fn get_by_id(&self, _id: JobId) -> Result<Option<Job>, RepositoryError> {
        Err(down())
    }

    async fn update_status(
        &self,
        _id: JobId,
        _status: JobStatus,
        _result_reference: Option<&str>,
        _error_detail: Option<&str>,
    ) -> Result<(), RepositoryError> {
        Err(down())
    }

    async fn record_failed_attempt(
        &self,
        _id: JobId,
        _error_detail: &str,
    ) -> Result<u32, RepositoryError> {
        Err(down())
    }

    async fn list_unfinished(&self) -> Result<Vec<Job>, RepositoryError> {
        Err(down())
    }

    async fn list_completed(&self) -> Result<Vec<CompletedBucket>, RepositoryError> {
        Err(down())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Err(down())
    }
}
