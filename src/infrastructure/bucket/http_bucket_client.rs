use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::application::ports::{BucketClient, BucketClientError, ExistingBucket};
use crate::domain::BucketName;

/// Talks to the storage network's bucket gateway over HTTP.
///
/// `GET {endpoint}/buckets/{name}` answers 200 for an existing bucket and 404
/// otherwise; `POST {endpoint}/buckets` creates one and returns the
/// transaction id. A semaphore caps the number of in-flight remote calls.
pub struct HttpBucketClient {
    client: Client,
    endpoint: String,
    credential: Option<String>,
    permits: Arc<Semaphore>,
}

#[derive(Serialize)]
struct CreateBucketRequest<'a> {
    name: &'a str,
}

#[derive(Deserialize)]
struct CreateBucketResponse {
    id: String,
}

#[derive(Deserialize)]
struct BucketResponse {
    name: String,
}

impl HttpBucketClient {
    pub fn new(
        endpoint: impl Into<String>,
        credential: Option<String>,
        max_concurrency: usize,
        connection_timeout: Duration,
    ) -> Result<Self, BucketClientError> {
        let client = Client::builder()
            .connect_timeout(connection_timeout)
            .timeout(connection_timeout)
            .build()
            .map_err(|e| BucketClientError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            credential: credential.filter(|c| !c.is_empty()),
            permits: Arc::new(Semaphore::new(max_concurrency.max(1))),
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credential {
            Some(credential) => request.bearer_auth(credential),
            None => request,
        }
    }

    async fn rejected(response: reqwest::Response) -> BucketClientError {
        let status = response.status();
        let message = response.text().await.unwrap_or_default();
        BucketClientError::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl BucketClient for HttpBucketClient {
    #[tracing::instrument(skip(self), fields(bucket_name = %name))]
    async fn lookup(&self, name: &BucketName) -> Result<Option<ExistingBucket>, BucketClientError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| BucketClientError::Unavailable(e.to_string()))?;

        let url = format!("{}/buckets/{}", self.endpoint, name);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| BucketClientError::Request(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let bucket: BucketResponse = response
                    .json()
                    .await
                    .map_err(|e| BucketClientError::InvalidResponse(e.to_string()))?;
                Ok(Some(ExistingBucket { name: bucket.name }))
            }
            _ => Err(Self::rejected(response).await),
        }
    }

    #[tracing::instrument(skip(self), fields(bucket_name = %name))]
    async fn create(&self, name: &BucketName) -> Result<String, BucketClientError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| BucketClientError::Unavailable(e.to_string()))?;

        let url = format!("{}/buckets", self.endpoint);
        let response = self
            .authorize(self.client.post(&url))
            .json(&CreateBucketRequest {
                name: name.as_str(),
            })
            .send()
            .await
            .map_err(|e| BucketClientError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejected(response).await);
        }

        let created: CreateBucketResponse = response
            .json()
            .await
            .map_err(|e| BucketClientError::InvalidResponse(e.to_string()))?;

        Ok(created.id)
    }
}
