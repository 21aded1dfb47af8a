//! Study Cache - read-through cache service for a flashcard study platform
//!
//! Caches the platform's hot reads (domain lists, class views, flashcard
//! collections, study progress) over a pluggable key-value backend, with
//! write-path invalidation and hit/miss/error metrics.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_sweep_task;
