mod create_bucket;
mod error_response;
mod health;
mod job_status;
mod list_buckets;

pub use create_bucket::{CreateBucketRequest, CreateBucketResponse, create_bucket_handler};
pub use error_response::ErrorResponse;
pub use health::{HealthResponse, health_handler, service_info_handler};
pub use job_status::{JobStatusResponse, job_status_handler};
pub use list_buckets::{BucketSummary, ListBucketsResponse, list_buckets_handler};
