//! Cache Module
//!
//! The read-through cache layer: a typed store over a pluggable key-value
//! backend, the single source of cache key strings with their TTL policy,
//! and the write-path invalidation hooks.

pub mod backend;
pub mod invalidation;
pub mod keys;
pub mod memory;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use backend::KeyValueBackend;
pub use invalidation::Invalidator;
pub use keys::CacheCategory;
pub use memory::MemoryBackend;
pub use store::{CacheHealth, CacheStore};
