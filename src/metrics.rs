//! Metrics Module
//!
//! Process-wide cache counters (hits, misses, errors) behind an explicit
//! injectable collector rather than ambient globals, so tests can construct
//! isolated instances. Exported both as a structured snapshot and in the
//! line-oriented text exposition format scraped by monitoring tooling.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Metrics Collector ==
/// Monotonic cache counters, shared across all requests of one process.
///
/// Counters use relaxed atomics: each increment is independent and no ordering
/// between counters is required, only that no increment is lost.
#[derive(Debug, Default)]
pub struct MetricsCollector {
    hits: AtomicU64,
    misses: AtomicU64,
    errors: AtomicU64,
}

/// Point-in-time view of the collector, with the derived hit rate in percent.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Number of cache reads served from the cache
    pub hits: u64,
    /// Number of cache reads that fell through to the catalog
    pub misses: u64,
    /// Number of cache operations that failed (backend or serialization)
    pub errors: u64,
    /// hits / (hits + misses) * 100, or 0.0 when no reads happened
    pub hit_rate: f64,
}

impl MetricsCollector {
    /// Creates a collector with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Miss ==
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Error ==
    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Reads all counters and computes the hit rate.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let errors = self.errors.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64 * 100.0
        };
        MetricsSnapshot {
            hits,
            misses,
            errors,
            hit_rate,
        }
    }

    // == Reset ==
    /// Returns all counters to zero without changing the collector lifecycle.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.errors.store(0, Ordering::Relaxed);
    }

    // == Text Exposition ==
    /// Renders the counters as `# HELP` / `# TYPE` / value lines.
    pub fn render_text(&self) -> String {
        let snap = self.snapshot();
        let mut out = String::with_capacity(512);

        let counters = [
            (
                "cache_hits_total",
                "Number of cache reads served from the cache.",
                snap.hits,
            ),
            (
                "cache_misses_total",
                "Number of cache reads that fell through to the catalog.",
                snap.misses,
            ),
            (
                "cache_errors_total",
                "Number of failed cache operations.",
                snap.errors,
            ),
        ];

        for (name, help, value) in counters {
            let _ = writeln!(out, "# HELP {} {}", name, help);
            let _ = writeln!(out, "# TYPE {} counter", name);
            let _ = writeln!(out, "{} {}", name, value);
        }

        let _ = writeln!(
            out,
            "# HELP cache_hit_rate Percentage of cache reads served from the cache."
        );
        let _ = writeln!(out, "# TYPE cache_hit_rate gauge");
        let _ = writeln!(out, "cache_hit_rate {:.2}", snap.hit_rate);

        out
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_starts_at_zero() {
        let snap = MetricsCollector::new().snapshot();
        assert_eq!(snap.hits, 0);
        assert_eq!(snap.misses, 0);
        assert_eq!(snap.errors, 0);
        assert_eq!(snap.hit_rate, 0.0);
    }

    #[test]
    fn test_hit_rate_percent() {
        let metrics = MetricsCollector::new();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();

        let snap = metrics.snapshot();
        assert!((snap.hit_rate - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_rate_all_misses() {
        let metrics = MetricsCollector::new();
        metrics.record_miss();
        metrics.record_miss();
        assert_eq!(metrics.snapshot().hit_rate, 0.0);
    }

    #[test]
    fn test_errors_do_not_affect_hit_rate() {
        let metrics = MetricsCollector::new();
        metrics.record_hit();
        metrics.record_error();

        let snap = metrics.snapshot();
        assert_eq!(snap.errors, 1);
        assert!((snap.hit_rate - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reset_zeroes_everything() {
        let metrics = MetricsCollector::new();
        metrics.record_hit();
        metrics.record_miss();
        metrics.record_error();

        metrics.reset();

        let snap = metrics.snapshot();
        assert_eq!(snap.hits, 0);
        assert_eq!(snap.misses, 0);
        assert_eq!(snap.errors, 0);
        assert_eq!(snap.hit_rate, 0.0);
    }

    #[test]
    fn test_render_text_format() {
        let metrics = MetricsCollector::new();
        metrics.record_hit();
        metrics.record_miss();

        let text = metrics.render_text();
        assert!(text.contains("# HELP cache_hits_total"));
        assert!(text.contains("# TYPE cache_hits_total counter"));
        assert!(text.contains("cache_hits_total 1"));
        assert!(text.contains("cache_misses_total 1"));
        assert!(text.contains("cache_errors_total 0"));
        assert!(text.contains("# TYPE cache_hit_rate gauge"));
        assert!(text.contains("cache_hit_rate 50.00"));
    }

    #[test]
    fn test_snapshot_serializes() {
        let metrics = MetricsCollector::new();
        metrics.record_hit();
        let json = serde_json::to_string(&metrics.snapshot()).unwrap();
        assert!(json.contains("\"hits\":1"));
        assert!(json.contains("hit_rate"));
    }
}
