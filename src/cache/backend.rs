//! Backing key-value store seam
//!
//! The cache layer only requires five operations of its backing store:
//! get, set-with-expiration, delete, delete-by-pattern, and a ping it can
//! time. Everything else about the store (wire protocol, authentication,
//! eviction under memory pressure) stays behind this trait.

use async_trait::async_trait;

use crate::error::CacheError;

/// Minimal contract the read-through layer needs from a key-value store.
///
/// Implementations must treat `del` on an absent key as success and must scope
/// `del_pattern` strictly to keys matching the pattern.
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// Fetches the raw serialized value for `key`, if present and unexpired.
    async fn get(&self, key: &str) -> std::result::Result<Option<String>, CacheError>;

    /// Writes `value` under `key`, expiring after `ttl_secs` seconds.
    async fn set(&self, key: &str, value: String, ttl_secs: u64)
        -> std::result::Result<(), CacheError>;

    /// Deletes one exact key. Absent keys are not an error.
    async fn del(&self, key: &str) -> std::result::Result<(), CacheError>;

    /// Deletes every key matching a `*` wildcard pattern; returns how many.
    async fn del_pattern(&self, pattern: &str) -> std::result::Result<u64, CacheError>;

    /// Lightweight round-trip used for health checks, never on the hot path.
    async fn ping(&self) -> std::result::Result<(), CacheError>;
}
