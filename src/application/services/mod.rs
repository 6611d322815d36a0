mod bucket_worker;
mod retry_policy;
mod status_service;
mod submission_service;

pub use bucket_worker::{BucketWorker, BucketWorkerError, BucketWorkerPool, TaskOutcome};
pub use retry_policy::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY, RetryPolicy};
pub use status_service::{StatusError, StatusService};
pub use submission_service::{SubmissionError, SubmissionService};
