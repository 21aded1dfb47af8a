//! Cache Store Module
//!
//! Typed read-through access to the backing key-value store. Every operation
//! is instrumented (hit/miss/error counters) and bounded by a short timeout,
//! and every failure internal to the cache is downgraded to a safe default:
//! absent value for reads, logged no-op for writes and deletes. The cache is
//! an optional accelerator, never a correctness dependency.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::backend::KeyValueBackend;
use crate::error::CacheError;
use crate::metrics::{MetricsCollector, MetricsSnapshot};

// == Cache Health ==
/// Result of a backing-store round trip, for operational monitoring.
#[derive(Debug, Clone)]
pub struct CacheHealth {
    /// Whether the ping completed within the operation timeout
    pub reachable: bool,
    /// Observed round-trip latency in milliseconds
    pub latency_ms: u64,
}

// == Cache Store ==
/// Instrumented, failure-tolerant wrapper over a [`KeyValueBackend`].
#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<dyn KeyValueBackend>,
    metrics: Arc<MetricsCollector>,
    op_timeout: Duration,
}

impl CacheStore {
    /// Creates a store over `backend` with the given per-operation timeout.
    pub fn new(backend: Arc<dyn KeyValueBackend>, op_timeout: Duration) -> Self {
        Self {
            backend,
            metrics: Arc::new(MetricsCollector::new()),
            op_timeout,
        }
    }

    /// Bounds a backend call by the operation timeout; a timeout is treated
    /// like any other backend failure.
    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, CacheError>>,
    ) -> Result<T, CacheError> {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(self.op_timeout.as_millis() as u64)),
        }
    }

    // == Get ==
    /// Looks up and deserializes `key`.
    ///
    /// Returns `None` on a normal miss, on backend failure, and on a payload
    /// that no longer decodes; only the counters distinguish the cases. Never
    /// returns an error to the caller.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.bounded(self.backend.get(key)).await {
            Ok(raw) => raw,
            Err(err) => {
                self.metrics.record_error();
                warn!(key, error = %err, "cache get failed, treating as miss");
                return None;
            }
        };

        match raw {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => {
                    self.metrics.record_hit();
                    Some(value)
                }
                Err(err) => {
                    self.metrics.record_error();
                    let err = CacheError::from(err);
                    warn!(key, error = %err, "cached payload failed to decode");
                    None
                }
            },
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Serializes and writes `value` under `key` with a TTL.
    ///
    /// Completes when the write finishes or fails; failures are logged and
    /// counted, never propagated. Callers on the response path detach this
    /// with `tokio::spawn` so population never delays the response.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl_secs: u64) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                self.metrics.record_error();
                let err = CacheError::from(err);
                warn!(key, error = %err, "cache set abandoned, value failed to encode");
                return;
            }
        };

        if let Err(err) = self.bounded(self.backend.set(key, raw, ttl_secs)).await {
            self.metrics.record_error();
            warn!(key, error = %err, "cache set failed");
        } else {
            debug!(key, ttl_secs, "cache populated");
        }
    }

    // == Delete ==
    /// Deletes one exact key. Idempotent; failures logged and swallowed.
    pub async fn del(&self, key: &str) {
        if let Err(err) = self.bounded(self.backend.del(key)).await {
            self.metrics.record_error();
            warn!(key, error = %err, "cache delete failed");
        }
    }

    // == Delete Pattern ==
    /// Deletes every key matching a wildcard pattern.
    pub async fn del_pattern(&self, pattern: &str) {
        match self.bounded(self.backend.del_pattern(pattern)).await {
            Ok(removed) => debug!(pattern, removed, "cache pattern delete"),
            Err(err) => {
                self.metrics.record_error();
                warn!(pattern, error = %err, "cache pattern delete failed");
            }
        }
    }

    // == Health ==
    /// Ping round trip with observed latency. Off the request hot path.
    pub async fn check_health(&self) -> CacheHealth {
        let started = Instant::now();
        let reachable = self.bounded(self.backend.ping()).await.is_ok();
        CacheHealth {
            reachable,
            latency_ms: started.elapsed().as_millis() as u64,
        }
    }

    // == Metrics ==
    /// Snapshot of the hit/miss/error counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Counters in text exposition format.
    pub fn metrics_text(&self) -> String {
        self.metrics.render_text()
    }

    /// Zeroes all counters.
    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::memory::MemoryBackend;
    use async_trait::async_trait;

    /// Backend double where every operation fails.
    struct FailingBackend;

    #[async_trait]
    impl KeyValueBackend for FailingBackend {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn set(&self, _key: &str, _value: String, _ttl: u64) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn del(&self, _key: &str) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn del_pattern(&self, _pattern: &str) -> Result<u64, CacheError> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn ping(&self) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }
    }

    /// Backend double where every operation hangs far past any timeout.
    struct SlowBackend;

    impl SlowBackend {
        async fn stall<T>() -> Result<T, CacheError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Err(CacheError::Unavailable("never reached".to_string()))
        }
    }

    #[async_trait]
    impl KeyValueBackend for SlowBackend {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Self::stall().await
        }

        async fn set(&self, _key: &str, _value: String, _ttl: u64) -> Result<(), CacheError> {
            Self::stall().await
        }

        async fn del(&self, _key: &str) -> Result<(), CacheError> {
            Self::stall().await
        }

        async fn del_pattern(&self, _pattern: &str) -> Result<u64, CacheError> {
            Self::stall().await
        }

        async fn ping(&self) -> Result<(), CacheError> {
            Self::stall().await
        }
    }

    fn memory_store() -> CacheStore {
        CacheStore::new(
            Arc::new(MemoryBackend::new(100)),
            Duration::from_millis(250),
        )
    }

    fn failing_store() -> CacheStore {
        CacheStore::new(Arc::new(FailingBackend), Duration::from_millis(250))
    }

    #[tokio::test]
    async fn test_round_trip_counts_miss_then_hit() {
        let store = memory_store();

        let absent: Option<Vec<String>> = store.get("domains:all").await;
        assert!(absent.is_none());

        let value = vec!["security".to_string(), "networking".to_string()];
        store.set("domains:all", &value, 300).await;

        let cached: Option<Vec<String>> = store.get("domains:all").await;
        assert_eq!(cached, Some(value));

        let snap = store.metrics();
        assert_eq!(snap.hits, 1);
        assert_eq!(snap.misses, 1);
        assert_eq!(snap.errors, 0);
        assert!((snap.hit_rate - 50.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_del_then_get_is_absent() {
        let store = memory_store();
        store.set("deck:d1:flashcards", &vec![1, 2, 3], 300).await;

        store.del("deck:d1:flashcards").await;
        let gone: Option<Vec<i32>> = store.get("deck:d1:flashcards").await;
        assert!(gone.is_none());

        // Deleting an absent key is a no-op, not an error
        store.del("deck:d1:flashcards").await;
        assert_eq!(store.metrics().errors, 0);
    }

    #[tokio::test]
    async fn test_backend_failure_downgrades_to_miss() {
        let store = failing_store();

        let value: Option<String> = store.get("domains:all").await;
        assert!(value.is_none());

        let snap = store.metrics();
        assert_eq!(snap.errors, 1);
        assert_eq!(snap.hits, 0);
        assert_eq!(snap.misses, 0);
    }

    #[tokio::test]
    async fn test_slow_backend_times_out_as_miss() {
        let store = CacheStore::new(Arc::new(SlowBackend), Duration::from_millis(50));

        let started = Instant::now();
        let value: Option<String> = store.get("domains:all").await;

        // The caller waits at most one timeout, not the backend's stall
        assert!(value.is_none());
        assert!(started.elapsed() < Duration::from_secs(1));

        let snap = store.metrics();
        assert_eq!(snap.errors, 1);
        assert_eq!(snap.hits, 0);
        assert_eq!(snap.misses, 0);
    }

    #[tokio::test]
    async fn test_slow_backend_health_reports_unreachable() {
        let store = CacheStore::new(Arc::new(SlowBackend), Duration::from_millis(50));

        let health = store.check_health().await;
        assert!(!health.reachable);
        assert!(health.latency_ms < 1000);
    }

    #[tokio::test]
    async fn test_failed_writes_and_deletes_are_silent() {
        let store = failing_store();

        store.set("k", &"v", 60).await;
        store.del("k").await;
        store.del_pattern("progress:u1:*").await;

        assert_eq!(store.metrics().errors, 3);
    }

    #[tokio::test]
    async fn test_undecodable_payload_counts_as_error() {
        let backend = Arc::new(MemoryBackend::new(100));
        backend
            .set("domains:all", "not json at all".to_string(), 300)
            .await
            .unwrap();

        let store = CacheStore::new(backend, Duration::from_millis(250));
        let value: Option<Vec<String>> = store.get("domains:all").await;
        assert!(value.is_none());
        assert_eq!(store.metrics().errors, 1);
    }

    #[tokio::test]
    async fn test_check_health() {
        let healthy = memory_store().check_health().await;
        assert!(healthy.reachable);

        let unhealthy = failing_store().check_health().await;
        assert!(!unhealthy.reachable);
    }

    #[tokio::test]
    async fn test_reset_metrics() {
        let store = memory_store();
        store.set("k", &"v", 60).await;
        let _: Option<String> = store.get("k").await;
        let _: Option<String> = store.get("absent").await;

        store.reset_metrics();

        let snap = store.metrics();
        assert_eq!(snap.hits, 0);
        assert_eq!(snap.misses, 0);
        assert_eq!(snap.errors, 0);
    }
}
