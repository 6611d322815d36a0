use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::application::ports::{BucketClient, BucketClientError, ExistingBucket};
use crate::domain::BucketName;

/// Stand-in for the storage network: remembers created buckets and hands out
/// synthetic transaction ids.
#[derive(Default)]
pub struct InMemoryBucketClient {
    buckets: RwLock<HashMap<String, String>>,
}

impl InMemoryBucketClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn transaction_id(&self, name: &str) -> Option<String> {
        self.buckets.read().await.get(name).cloned()
    }
}

#[async_trait]
impl BucketClient for InMemoryBucketClient {
    async fn lookup(&self, name: &BucketName) -> Result<Option<ExistingBucket>, BucketClientError> {
        Ok(self
            .buckets
            .read()
            .await
            .get(name.as_str())
            .map(|_| ExistingBucket {
                name: name.to_string(),
            }))
    }

    async fn create(&self, name: &BucketName) -> Result<String, BucketClientError> {
        let mut buckets = self.buckets.write().await;
        if buckets.contains_key(name.as_str()) {
            return Err(BucketClientError::Rejected {
                status: 409,
                message: format!("bucket {} already exists", name),
            });
        }

        let tx_id = format!("0x{}", Uuid::new_v4().simple());
        buckets.insert(name.to_string(), tx_id.clone());
        Ok(tx_id)
    }
}
