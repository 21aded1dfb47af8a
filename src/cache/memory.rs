//! In-process key-value backend
//!
//! Stand-in for the external key-value store: TTL-stamped entries with lazy
//! expiry on read, a periodic sweep hook, `*` wildcard pattern deletion, and a
//! capacity cap with least-recently-used eviction (the real store owns memory
//! pressure; here the backend is in-process, so it handles it itself).

use std::collections::{HashMap, VecDeque};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::backend::KeyValueBackend;
use crate::error::CacheError;

// == Stored Entry ==
/// A serialized value with its absolute expiration time.
#[derive(Debug, Clone)]
struct StoredEntry {
    value: String,
    /// Expiration timestamp (Unix milliseconds)
    expires_at: u64,
}

impl StoredEntry {
    fn new(value: String, ttl_secs: u64) -> Self {
        Self {
            value,
            expires_at: current_timestamp_ms() + ttl_secs * 1000,
        }
    }

    /// Expired once the current time reaches the expiration time.
    fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.expires_at
    }
}

/// Returns current Unix timestamp in milliseconds.
fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

// == Pattern Matching ==
/// Matches a key against a `*` wildcard pattern.
///
/// A pattern without a wildcard matches only the identical key, so a key
/// family outside the pattern's namespace can never be touched by it.
pub(crate) fn key_matches(pattern: &str, key: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == key;
    }

    let parts: Vec<&str> = pattern.split('*').collect();
    let mut rest = key;

    // Leading literal must be a prefix
    let first = parts[0];
    if !rest.starts_with(first) {
        return false;
    }
    rest = &rest[first.len()..];

    // Middle literals must appear in order
    for mid in &parts[1..parts.len() - 1] {
        if mid.is_empty() {
            continue;
        }
        match rest.find(mid) {
            Some(idx) => rest = &rest[idx + mid.len()..],
            None => return false,
        }
    }

    // Trailing literal must be a suffix of what remains
    rest.ends_with(parts[parts.len() - 1])
}

// == Memory Backend ==
/// In-memory implementation of [`KeyValueBackend`].
#[derive(Debug)]
pub struct MemoryBackend {
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    /// Key-value storage
    entries: HashMap<String, StoredEntry>,
    /// Access order: front = most recently used, back = least recently used
    recency: VecDeque<String>,
    /// Maximum number of entries before LRU eviction kicks in
    max_entries: usize,
}

impl Inner {
    /// Marks a key as recently used (moves to front).
    fn touch(&mut self, key: &str) {
        self.recency.retain(|k| k != key);
        self.recency.push_front(key.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
        self.recency.retain(|k| k != key);
    }
}

impl MemoryBackend {
    /// Creates a backend holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: HashMap::new(),
                recency: VecDeque::new(),
                max_entries,
            }),
        }
    }

    /// Removes all expired entries; returns how many were removed.
    ///
    /// Called periodically by the cleanup task so expired entries do not
    /// linger until the next read touches them.
    pub async fn sweep_expired(&self) -> usize {
        let mut inner = self.inner.write().await;
        let expired: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            inner.remove(key);
        }
        expired.len()
    }

    /// Current number of live entries (expired-but-unswept included).
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    /// Returns true if the backend holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }
}

#[async_trait]
impl KeyValueBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut inner = self.inner.write().await;
        let live = match inner.entries.get(key) {
            None => return Ok(None),
            Some(entry) if entry.is_expired() => None,
            Some(entry) => Some(entry.value.clone()),
        };

        match live {
            Some(value) => {
                inner.touch(key);
                Ok(Some(value))
            }
            None => {
                inner.remove(key);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: String, ttl_secs: u64) -> Result<(), CacheError> {
        let mut inner = self.inner.write().await;

        // At capacity and inserting a new key: evict the least recently used
        if !inner.entries.contains_key(key) && inner.entries.len() >= inner.max_entries {
            if let Some(oldest) = inner.recency.pop_back() {
                inner.entries.remove(&oldest);
            }
        }

        inner
            .entries
            .insert(key.to_string(), StoredEntry::new(value, ttl_secs));
        inner.touch(key);
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), CacheError> {
        let mut inner = self.inner.write().await;
        inner.remove(key);
        Ok(())
    }

    async fn del_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        let mut inner = self.inner.write().await;
        let matching: Vec<String> = inner
            .entries
            .keys()
            .filter(|key| key_matches(pattern, key))
            .cloned()
            .collect();

        for key in &matching {
            inner.remove(key);
        }
        Ok(matching.len() as u64)
    }

    async fn ping(&self) -> Result<(), CacheError> {
        // Taking and releasing the lock is the round trip
        let _ = self.inner.read().await;
        Ok(())
    }
}
