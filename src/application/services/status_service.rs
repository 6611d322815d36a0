use std::sync::Arc;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{CompletedBucket, Job, JobId};

/// Read-only view over the job store.
pub struct StatusService {
    job_repository: Arc<dyn JobRepository>,
}

impl StatusService {
    pub fn new(job_repository: Arc<dyn JobRepository>) -> Self {
        Self { job_repository }
    }

    pub async fn get_status(&self, id: JobId) -> Result<Job, StatusError> {
        self.job_repository
            .get_by_id(id)
            .await?
            .ok_or(StatusError::NotFound(id))
    }

    pub async fn list_completed_buckets(&self) -> Result<Vec<CompletedBucket>, StatusError> {
        Ok(self.job_repository.list_completed().await?)
    }

    pub async fn health(&self) -> Result<(), StatusError> {
        Ok(self.job_repository.ping().await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    #[error("job not found: {0}")]
    NotFound(JobId),
    #[error("store: {0}")]
    Store(#[from] RepositoryError),
}
