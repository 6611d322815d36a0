use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{BucketClient, BucketClientError};
use crate::presentation::config::{BucketClientProvider, BucketClientSettings};

use super::http_bucket_client::HttpBucketClient;
use super::in_memory_bucket_client::InMemoryBucketClient;

pub struct BucketClientFactory;

impl BucketClientFactory {
    pub fn create(
        settings: &BucketClientSettings,
    ) -> Result<Arc<dyn BucketClient>, BucketClientError> {
        match settings.provider {
            BucketClientProvider::Http => {
                let endpoint = settings.endpoint.as_deref().ok_or_else(|| {
                    BucketClientError::Unavailable("bucket_client.endpoint required".into())
                })?;
                let client = HttpBucketClient::new(
                    endpoint,
                    settings.credential.clone(),
                    settings.max_concurrency,
                    Duration::from_secs(settings.connection_timeout_secs),
                )?;
                Ok(Arc::new(client))
            }
            BucketClientProvider::InMemory => Ok(Arc::new(InMemoryBucketClient::new())),
        }
    }
}
