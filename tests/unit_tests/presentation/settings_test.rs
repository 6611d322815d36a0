use std::time::Duration;

use bucketlink::presentation::config::{BucketClientProvider, WorkerSettings};
use bucketlink::presentation::{Environment, Settings};

#[test]
fn given_no_overrides_when_loading_test_settings_then_defaults_apply() {
    let settings = Settings::load(Environment::Test).unwrap();

    assert_eq!(settings.server.port, 8000);
    assert_eq!(settings.bucket_client.provider, BucketClientProvider::Http);
    assert_eq!(settings.bucket_client.max_concurrency, 5);
    assert_eq!(settings.worker.max_attempts, 3);
    assert_eq!(settings.worker.retry_delay_secs, 10);
    assert!(!settings.logging.json_format);
}

#[test]
fn given_worker_settings_when_building_retry_policy_then_values_are_used() {
    let worker = WorkerSettings {
        concurrency: 2,
        queue_capacity: 16,
        max_attempts: 5,
        retry_delay_secs: 2,
    };

    let policy = worker.retry_policy();

    assert_eq!(policy.max_attempts, 5);
    assert_eq!(policy.delay, Duration::from_secs(2));
}
