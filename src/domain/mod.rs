mod bucket_name;
mod completed_bucket;
mod job;
mod job_id;
mod job_status;

pub use bucket_name::{BucketName, BucketNameError, MAX_BUCKET_NAME_LEN, MIN_BUCKET_NAME_LEN};
pub use completed_bucket::CompletedBucket;
pub use job::{EXISTING_BUCKET_REFERENCE, Job, JobTransitionError};
pub use job_id::JobId;
pub use job_status::JobStatus;
