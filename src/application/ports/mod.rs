mod bucket_client;
mod job_queue;
mod job_repository;
mod repository_error;

pub use bucket_client::{BucketClient, BucketClientError, ExistingBucket};
pub use job_queue::{BucketTask, JobQueue, JobQueueError, TaskSource};
pub use job_repository::JobRepository;
pub use repository_error::RepositoryError;
