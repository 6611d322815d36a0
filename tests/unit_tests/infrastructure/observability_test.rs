use axum::http::{HeaderMap, HeaderValue};

use bucketlink::infrastructure::observability::{
    MAX_REQUEST_ID_LEN, REQUEST_ID_HEADER, RequestId, TracingConfig,
};
use bucketlink::presentation::config::{Environment, LoggingSettings};

#[test]
fn given_request_id_header_constant_when_accessed_then_returns_correct_value() {
    assert_eq!(REQUEST_ID_HEADER, "x-request-id");
}

fn headers_with(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(REQUEST_ID_HEADER, HeaderValue::from_str(value).unwrap());
    headers
}

#[test]
fn given_caller_supplied_id_when_reading_headers_then_it_is_kept() {
    let request_id = RequestId::from_headers(&headers_with("trace-42")).unwrap();
    assert_eq!(request_id.as_str(), "trace-42");
    assert_eq!(request_id.to_string(), "trace-42");
}

#[test]
fn given_missing_or_blank_header_when_reading_headers_then_none() {
    assert!(RequestId::from_headers(&HeaderMap::new()).is_none());
    assert!(RequestId::from_headers(&headers_with("   ")).is_none());
}

#[test]
fn given_oversized_id_when_reading_headers_then_it_is_ignored() {
    let at_limit = "a".repeat(MAX_REQUEST_ID_LEN);
    let too_long = "a".repeat(MAX_REQUEST_ID_LEN + 1);

    assert!(RequestId::from_headers(&headers_with(&at_limit)).is_some());
    assert!(RequestId::from_headers(&headers_with(&too_long)).is_none());
}

#[test]
fn given_id_with_inner_whitespace_when_reading_headers_then_it_is_ignored() {
    assert!(RequestId::from_headers(&headers_with("two words")).is_none());
}

#[test]
fn given_generated_ids_when_compared_then_they_are_distinct_uuids() {
    let first = RequestId::generate();
    let second = RequestId::generate();

    assert_ne!(first, second);
    assert!(uuid::Uuid::parse_str(first.as_str()).is_ok());
}

#[test]
fn given_default_config_when_created_then_environment_is_set() {
    let config = TracingConfig::default();
    assert!(!config.environment.is_empty());
    assert!(config.default_directive.contains("bucketlink"));
}

#[test]
fn given_logging_settings_when_building_config_then_values_are_carried_over() {
    let logging = LoggingSettings {
        level: "warn".to_string(),
        json_format: true,
    };

    let config = TracingConfig::from_settings(Environment::Prod, &logging);

    assert_eq!(config.environment, "prod");
    assert!(config.json_format);
    assert_eq!(config.default_directive, "warn");
}
