use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{CompletedBucket, Job, JobId, JobStatus};

/// Process-local job store for local runs and tests.
#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn create(&self, job: &Job) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(RepositoryError::DuplicateId(job.id.to_string()));
        }
        jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(self.jobs.read().await.get(&id).cloned())
    }

    async fn update_status(
        &self,
        id: JobId,
        status: JobStatus,
        result_reference: Option<&str>,
        error_detail: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        job.transition(status, result_reference, error_detail, Utc::now())
            .map_err(|e| RepositoryError::InvalidTransition {
                id: id.to_string(),
                from: e.from,
                to: e.to,
            })
    }

    async fn record_failed_attempt(
        &self,
        id: JobId,
        error_detail: &str,
    ) -> Result<u32, RepositoryError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        if job.status.is_terminal() {
            return Err(RepositoryError::InvalidTransition {
                id: id.to_string(),
                from: job.status,
                to: JobStatus::Processing,
            });
        }

        job.attempts += 1;
        job.last_error = Some(error_detail.to_string());
        job.updated_at = Utc::now();
        Ok(job.attempts)
    }

    async fn list_unfinished(&self) -> Result<Vec<Job>, RepositoryError> {
        let jobs = self.jobs.read().await;
        let mut unfinished: Vec<Job> = jobs
            .values()
            .filter(|j| !j.status.is_terminal())
            .cloned()
            .collect();

        unfinished.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(unfinished)
    }

    async fn list_completed(&self) -> Result<Vec<CompletedBucket>, RepositoryError> {
        let jobs = self.jobs.read().await;
        let mut completed: Vec<CompletedBucket> = jobs
            .values()
            .filter(|j| j.status == JobStatus::Completed)
            .map(|j| CompletedBucket {
                bucket_name: j.bucket_name.clone(),
                result_reference: j.result_reference.clone(),
                created_at: j.created_at,
            })
            .collect();

        completed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(completed)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
