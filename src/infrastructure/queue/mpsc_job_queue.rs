use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use crate::application::ports::{BucketTask, JobQueue, JobQueueError, TaskSource};

/// Builds a bounded in-process work channel. The receiving half may be shared
/// by any number of workers; each task reaches exactly one of them.
pub fn job_channel(capacity: usize) -> (MpscJobQueue, MpscTaskSource) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (
        MpscJobQueue { sender },
        MpscTaskSource {
            receiver: Arc::new(Mutex::new(receiver)),
        },
    )
}

#[derive(Clone)]
pub struct MpscJobQueue {
    sender: mpsc::Sender<BucketTask>,
}

#[async_trait]
impl JobQueue for MpscJobQueue {
    async fn enqueue(&self, task: BucketTask) -> Result<(), JobQueueError> {
        self.sender.try_send(task).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => JobQueueError::Full,
            mpsc::error::TrySendError::Closed(_) => JobQueueError::Closed,
        })
    }

    async fn redeliver(&self, task: BucketTask) -> Result<(), JobQueueError> {
        self.sender
            .send(task)
            .await
            .map_err(|_| JobQueueError::Closed)
    }
}

#[derive(Clone)]
pub struct MpscTaskSource {
    receiver: Arc<Mutex<mpsc::Receiver<BucketTask>>>,
}

#[async_trait]
impl TaskSource for MpscTaskSource {
    async fn next_task(&self) -> Option<BucketTask> {
        self.receiver.lock().await.recv().await
    }
}
