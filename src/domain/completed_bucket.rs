use chrono::{DateTime, Utc};

use super::BucketName;

/// Read model row for a bucket whose creation job finished successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedBucket {
    pub bucket_name: BucketName,
    pub result_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}
