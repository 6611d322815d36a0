use std::sync::Arc;

use crate::application::ports::{
    BucketTask, JobQueue, JobQueueError, JobRepository, RepositoryError,
};
use crate::domain::{BucketName, BucketNameError, Job};

/// Accepts bucket-creation requests: validates the name, persists a `queued`
/// job and hands it to the workers without waiting for them.
pub struct SubmissionService {
    job_repository: Arc<dyn JobRepository>,
    job_queue: Arc<dyn JobQueue>,
}

impl SubmissionService {
    pub fn new(job_repository: Arc<dyn JobRepository>, job_queue: Arc<dyn JobQueue>) -> Self {
        Self {
            job_repository,
            job_queue,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn submit(&self, bucket_name: &str) -> Result<Job, SubmissionError> {
        let bucket_name = BucketName::parse(bucket_name)?;
        let job = Job::new(bucket_name);

        self.job_repository
            .create(&job)
            .await
            .map_err(SubmissionError::Store)?;

        let task = BucketTask {
            job_id: job.id,
            bucket_name: job.bucket_name.clone(),
        };

        if let Err(e) = self.job_queue.enqueue(task).await {
            // The row stays `queued` with no worker behind it.
            tracing::warn!(
                job_id = %job.id,
                bucket_name = %job.bucket_name,
                error = %e,
                "Job persisted but could not be enqueued"
            );
            return Err(SubmissionError::QueueUnavailable(e));
        }

        tracing::info!(
            job_id = %job.id,
            bucket_name = %job.bucket_name,
            "Bucket creation job enqueued"
        );

        Ok(job)
    }

    /// Jobs a previous run left `queued` or `processing`. Take this snapshot
    /// before accepting submissions, or fresh jobs get delivered twice.
    pub async fn unfinished_jobs(&self) -> Result<Vec<Job>, SubmissionError> {
        self.job_repository
            .list_unfinished()
            .await
            .map_err(SubmissionError::Store)
    }

    /// Puts recovered jobs back on the work channel, waiting for room. Each
    /// resumes with its persisted attempt count. Returns how many were sent.
    pub async fn requeue(&self, unfinished: Vec<Job>) -> Result<usize, SubmissionError> {
        for job in &unfinished {
            tracing::info!(
                job_id = %job.id,
                bucket_name = %job.bucket_name,
                status = %job.status,
                attempts = job.attempts,
                "Re-queueing unfinished job"
            );
            self.job_queue
                .redeliver(BucketTask {
                    job_id: job.id,
                    bucket_name: job.bucket_name.clone(),
                })
                .await
                .map_err(SubmissionError::QueueUnavailable)?;
        }

        Ok(unfinished.len())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("{0}")]
    InvalidInput(#[from] BucketNameError),
    #[error("store: {0}")]
    Store(RepositoryError),
    #[error("queue unavailable: {0}")]
    QueueUnavailable(JobQueueError),
}
