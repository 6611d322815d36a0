mod bucket_client_factory;
mod http_bucket_client;
mod in_memory_bucket_client;

pub use bucket_client_factory::BucketClientFactory;
pub use http_bucket_client::HttpBucketClient;
pub use in_memory_bucket_client::InMemoryBucketClient;
