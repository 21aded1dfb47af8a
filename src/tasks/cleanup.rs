//! Expired-Entry Sweep Task
//!
//! Background task that periodically removes expired entries from the
//! in-process cache backend. Without it, expired entries would linger until
//! the next read touched them.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryBackend;

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps.
///
/// # Arguments
/// * `backend` - Shared reference to the memory backend
/// * `sweep_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_sweep_task(backend: Arc<MemoryBackend>, sweep_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(sweep_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting expired-entry sweep task with interval of {} seconds",
            sweep_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = backend.sweep_expired().await;
            if removed > 0 {
                info!("Sweep removed {} expired cache entries", removed);
            } else {
                debug!("Sweep found no expired cache entries");
            }
        }
    })
}
