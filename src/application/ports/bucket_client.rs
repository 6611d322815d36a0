use async_trait::async_trait;

use crate::domain::BucketName;

/// Marker returned by a lookup that found the bucket on the remote network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingBucket {
    pub name: String,
}

/// Remote storage network operations the job pipeline depends on.
#[async_trait]
pub trait BucketClient: Send + Sync {
    async fn lookup(&self, name: &BucketName) -> Result<Option<ExistingBucket>, BucketClientError>;

    /// Creates the bucket and returns the transaction id of the creation.
    async fn create(&self, name: &BucketName) -> Result<String, BucketClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum BucketClientError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("rejected by remote ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("client unavailable: {0}")]
    Unavailable(String),
}
