//! Tests for the Redis voucher backend.
//!
//! Tests that talk to a server are ignored by default. Run them with
//! `REDIS_URL=redis://127.0.0.1:6379/15 cargo test --features redis -- --ignored`.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::redis_backend::{REDEEM_SCRIPT, RedisBackend, RedisConfig};
use crate::{Metadata, RedemptionEngine, VoucherBackend, VoucherError, VoucherStore};

fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379/15".to_string())
}

async fn setup() -> Arc<RedisBackend> {
    let backend = RedisBackend::connect(RedisConfig::new(redis_url()))
        .await
        .expect("Failed to connect to redis");
    Arc::new(backend)
}

#[test]
fn test_config_defaults() {
    let config = RedisConfig::default();
    assert_eq!(config.redis_url, "redis://127.0.0.1:6379/0");
    assert_eq!(config.connection_timeout, Duration::from_secs(1));
    assert_eq!(config.response_timeout, Duration::from_secs(1));
    assert_eq!(config.number_of_retries, 1);
}

#[test]
fn test_config_builder() {
    let config = RedisConfig::new("redis://cache:6379/2")
        .connection_timeout(Duration::from_millis(250))
        .response_timeout(Duration::from_millis(750))
        .number_of_retries(3);

    assert_eq!(config.redis_url, "redis://cache:6379/2");
    assert_eq!(config.connection_timeout, Duration::from_millis(250));
    assert_eq!(config.response_timeout, Duration::from_millis(750));
    assert_eq!(config.number_of_retries, 3);
}

#[test]
fn test_config_debug_hides_url() {
    let config = RedisConfig::new("redis://:hunter2@cache:6379/0");
    let debug_str = format!("{config:?}");
    assert!(!debug_str.contains("hunter2"));
    assert!(debug_str.contains("RedisConfig"));
}

#[test]
fn test_script_contract() {
    assert!(REDEEM_SCRIPT.contains("HGET"));
    assert!(REDEEM_SCRIPT.contains("HINCRBY"));
    assert!(REDEEM_SCRIPT.contains("return -1"));
}

#[tokio::test]
async fn test_connect_invalid_url() {
    let result = RedisBackend::connect(RedisConfig::new("not-a-url")).await;
    assert!(matches!(result, Err(VoucherError::Backend(_))));
}

#[tokio::test]
async fn test_connect_refused_is_unavailable() {
    let config = RedisConfig::new("redis://127.0.0.1:1/0")
        .connection_timeout(Duration::from_millis(200))
        .number_of_retries(0);
    let err = RedisBackend::connect(config).await.unwrap_err();
    assert!(err.is_unavailable(), "unexpected error: {err:?}");
}

#[tokio::test]
#[ignore = "requires a running redis server"]
async fn test_end_to_end_sequence() {
    let backend = setup().await;
    let store = VoucherStore::new(backend.clone());
    let engine = RedemptionEngine::new(backend);

    let metadata: Metadata = [
        ("description", "10% off on all items"),
        ("expiry_date", "2024-12-31T23:59:59"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let code = store.create(4, Some(&metadata)).await.unwrap();
    let fields = store.get(code.as_str()).await.unwrap();
    assert_eq!(fields["uses"], "4");
    assert_eq!(fields["description"], "10% off on all items");
    assert_eq!(fields["expiry_date"], "2024-12-31T23:59:59");

    let mut results = Vec::new();
    for _ in 0..5 {
        results.push(engine.redeem(code.as_str()).await.unwrap());
    }
    assert_eq!(results, vec![3, 2, 1, 0, -1]);
    assert_eq!(store.uses(code.as_str()).await.unwrap(), Some(0));
}

#[tokio::test]
#[ignore = "requires a running redis server"]
async fn test_missing_voucher() {
    let backend = setup().await;
    let engine = RedemptionEngine::new(backend);
    assert_eq!(engine.redeem("voucher-that-was-never-created").await.unwrap(), -1);
}

#[tokio::test]
#[ignore = "requires a running redis server"]
async fn test_non_numeric_uses_is_script_error() {
    let backend = setup().await;
    let key = format!("test:{}", uuid::Uuid::new_v4());
    backend
        .write_fields(&key, &[("uses".to_string(), "many".to_string())])
        .await
        .unwrap();

    let err = backend.decrement_if_positive(&key, "uses").await.unwrap_err();
    assert!(matches!(err, VoucherError::Script(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires a running redis server"]
async fn test_concurrent_redemptions() {
    let backend = setup().await;
    let store = VoucherStore::new(backend.clone());
    let engine = Arc::new(RedemptionEngine::new(backend));
    let code = store.create(5, None).await.unwrap();

    let handles: Vec<_> = (0..40)
        .map(|_| {
            let engine = engine.clone();
            let code = code.clone();
            tokio::spawn(async move { engine.redeem(code.as_str()).await.unwrap() })
        })
        .collect();

    let mut values = Vec::new();
    for handle in handles {
        values.push(handle.await.unwrap());
    }

    let successes: HashSet<i64> = values.iter().copied().filter(|v| *v >= 0).collect();
    assert_eq!(successes, (0..5).collect());
    assert_eq!(values.iter().filter(|v| **v >= 0).count(), 5);
    assert_eq!(values.iter().filter(|v| **v == -1).count(), 35);
}
