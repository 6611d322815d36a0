use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::application::ports::{
    BucketClient, BucketClientError, BucketTask, JobRepository, RepositoryError, TaskSource,
};
use crate::domain::{BucketName, EXISTING_BUCKET_REFERENCE, JobId, JobStatus};

use super::RetryPolicy;

/// How a single delivery of a [`BucketTask`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// `create` succeeded and returned this reference.
    Created { result_reference: String },
    /// `lookup` found the bucket, nothing was created.
    AlreadyExisted,
    /// Retry budget exhausted.
    Failed { attempts: u32, error_detail: String },
    /// The job was already terminal when the task arrived (duplicate delivery).
    AlreadyTerminal(JobStatus),
    /// No job row for this task.
    UnknownJob,
}

enum AttemptSuccess {
    Created(String),
    Existing,
}

/// Consumes bucket tasks and drives each job through
/// `queued -> processing -> completed | failed`.
pub struct BucketWorker {
    worker_id: usize,
    tasks: Arc<dyn TaskSource>,
    job_repository: Arc<dyn JobRepository>,
    bucket_client: Arc<dyn BucketClient>,
    retry_policy: RetryPolicy,
}

impl BucketWorker {
    pub fn new(
        worker_id: usize,
        tasks: Arc<dyn TaskSource>,
        job_repository: Arc<dyn JobRepository>,
        bucket_client: Arc<dyn BucketClient>,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            worker_id,
            tasks,
            job_repository,
            bucket_client,
            retry_policy,
        }
    }

    pub async fn run(self) {
        tracing::info!(worker_id = self.worker_id, "Bucket worker started");
        while let Some(task) = self.tasks.next_task().await {
            let span = tracing::info_span!(
                "bucket_job",
                worker_id = self.worker_id,
                job_id = %task.job_id,
                bucket_name = %task.bucket_name,
            );

            if let Err(e) = self.process_task(task).instrument(span).await {
                tracing::error!(worker_id = self.worker_id, error = %e, "Bucket job aborted");
            }
        }
        tracing::info!(worker_id = self.worker_id, "Bucket worker stopped: queue closed");
    }

    /// Runs one delivery to completion: at most `max_attempts` remote
    /// attempts, counting the failures already persisted for this job.
    pub async fn process_task(&self, task: BucketTask) -> Result<TaskOutcome, BucketWorkerError> {
        let job_id = task.job_id;

        let job = match self.job_repository.get_by_id(job_id).await? {
            Some(job) => job,
            None => {
                tracing::warn!("No job row for delivered task, dropping");
                return Ok(TaskOutcome::UnknownJob);
            }
        };

        if job.status.is_terminal() {
            tracing::debug!(status = %job.status, "Job already terminal, ignoring delivery");
            return Ok(TaskOutcome::AlreadyTerminal(job.status));
        }

        let mut attempts = job.attempts;
        if !self.retry_policy.should_retry(attempts) {
            let error_detail = job
                .last_error
                .unwrap_or_else(|| format!("retry budget exhausted after {} attempts", attempts));
            tracing::warn!(attempts, error = %error_detail, "Redelivered job has no attempts left");
            self.update_status(job_id, JobStatus::Failed, None, Some(&error_detail))
                .await?;
            return Ok(TaskOutcome::Failed {
                attempts,
                error_detail,
            });
        }

        loop {
            self.update_status(job_id, JobStatus::Processing, None, None)
                .await?;

            match self.attempt(&task.bucket_name).await {
                Ok(AttemptSuccess::Existing) => {
                    self.update_status(
                        job_id,
                        JobStatus::Completed,
                        Some(EXISTING_BUCKET_REFERENCE),
                        None,
                    )
                    .await?;
                    tracing::info!("Bucket already exists");
                    return Ok(TaskOutcome::AlreadyExisted);
                }
                Ok(AttemptSuccess::Created(result_reference)) => {
                    self.update_status(
                        job_id,
                        JobStatus::Completed,
                        Some(&result_reference),
                        None,
                    )
                    .await?;
                    tracing::info!(tx_hash = %result_reference, "Bucket created");
                    return Ok(TaskOutcome::Created { result_reference });
                }
                Err(e) => {
                    let error_detail = e.to_string();
                    attempts = self
                        .job_repository
                        .record_failed_attempt(job_id, &error_detail)
                        .await?;

                    tracing::warn!(
                        attempt = attempts,
                        max_attempts = self.retry_policy.max_attempts,
                        error = %error_detail,
                        "Bucket creation attempt failed"
                    );

                    if !self.retry_policy.should_retry(attempts) {
                        self.update_status(job_id, JobStatus::Failed, None, Some(&error_detail))
                            .await?;
                        tracing::error!(attempts, error = %error_detail, "Bucket creation failed");
                        return Ok(TaskOutcome::Failed {
                            attempts,
                            error_detail,
                        });
                    }

                    tracing::info!(
                        delay_ms = self.retry_policy.delay.as_millis() as u64,
                        "Retrying bucket creation"
                    );
                    tokio::time::sleep(self.retry_policy.delay).await;
                }
            }
        }
    }

    async fn attempt(&self, bucket_name: &BucketName) -> Result<AttemptSuccess, BucketClientError> {
        tracing::debug!("Checking if bucket exists");
        if self.bucket_client.lookup(bucket_name).await?.is_some() {
            return Ok(AttemptSuccess::Existing);
        }

        tracing::debug!("Creating bucket");
        let result_reference = self.bucket_client.create(bucket_name).await?;
        Ok(AttemptSuccess::Created(result_reference))
    }

    async fn update_status(
        &self,
        job_id: JobId,
        status: JobStatus,
        result_reference: Option<&str>,
        error_detail: Option<&str>,
    ) -> Result<(), BucketWorkerError> {
        tracing::debug!(status = %status, "Job status transition");
        self.job_repository
            .update_status(job_id, status, result_reference, error_detail)
            .await
            .map_err(BucketWorkerError::Repository)
    }
}

/// Spawns `concurrency` workers that share one task source.
pub struct BucketWorkerPool;

impl BucketWorkerPool {
    pub fn spawn(
        concurrency: usize,
        tasks: Arc<dyn TaskSource>,
        job_repository: Arc<dyn JobRepository>,
        bucket_client: Arc<dyn BucketClient>,
        retry_policy: RetryPolicy,
    ) -> Vec<JoinHandle<()>> {
        (0..concurrency.max(1))
            .map(|worker_id| {
                let worker = BucketWorker::new(
                    worker_id,
                    Arc::clone(&tasks),
                    Arc::clone(&job_repository),
                    Arc::clone(&bucket_client),
                    retry_policy,
                );
                tokio::spawn(worker.run())
            })
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BucketWorkerError {
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}
