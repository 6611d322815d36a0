use async_trait::async_trait;

use crate::domain::{BucketName, JobId};

/// Unit of work handed from the submission gateway to the bucket workers.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketTask {
    pub job_id: JobId,
    pub bucket_name: BucketName,
}

/// Producer side of the work channel.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Fails fast with `Full` when the channel has no room.
    async fn enqueue(&self, task: BucketTask) -> Result<(), JobQueueError>;

    /// Waits for room instead of failing; used when re-queueing recovered jobs.
    async fn redeliver(&self, task: BucketTask) -> Result<(), JobQueueError>;
}

/// Consumer side of the work channel. Each task is handed to exactly one
/// caller; `None` means the channel is closed and drained.
#[async_trait]
pub trait TaskSource: Send + Sync {
    async fn next_task(&self) -> Option<BucketTask>;
}

#[derive(Debug, thiserror::Error)]
pub enum JobQueueError {
    #[error("queue closed")]
    Closed,
    #[error("queue full")]
    Full,
}
