//! Prometheus metrics for the file cleanup worker
//!
//! Tracks passes, removed and failed objects, and pass duration.

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};
use std::time::Duration;

/// Cleanup passes by outcome (success/error)
static CLEANUP_RUNS_TOTAL: Lazy<Option<IntCounterVec>> = Lazy::new(|| {
    register_int_counter_vec!(
        "news_file_cleanup_runs_total",
        "Total number of file cleanup passes (success/error)",
        &["result"]
    )
    .map_err(|e| tracing::warn!(error = %e, "Failed to register news_file_cleanup_runs_total"))
    .ok()
});

static REMOVED_TOTAL: Lazy<Option<IntCounter>> = Lazy::new(|| {
    register_int_counter!(
        "news_file_cleanup_removed_total",
        "Objects removed from storage and marked hard deleted"
    )
    .map_err(|e| tracing::warn!(error = %e, "Failed to register news_file_cleanup_removed_total"))
    .ok()
});

static FAILED_TOTAL: Lazy<Option<IntCounter>> = Lazy::new(|| {
    register_int_counter!(
        "news_file_cleanup_failed_total",
        "Object removals that failed and stay pending"
    )
    .map_err(|e| tracing::warn!(error = %e, "Failed to register news_file_cleanup_failed_total"))
    .ok()
});

static CLEANUP_DURATION_SECONDS: Lazy<Option<Histogram>> = Lazy::new(|| {
    register_histogram!(
        "news_file_cleanup_duration_seconds",
        "Duration of file cleanup passes",
        vec![0.01, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0]
    )
    .map_err(|e| tracing::warn!(error = %e, "Failed to register news_file_cleanup_duration_seconds"))
    .ok()
});

pub fn record_cleanup_run(result: &str) {
    if let Some(counter) = CLEANUP_RUNS_TOTAL.as_ref() {
        counter.with_label_values(&[result]).inc();
    }
}

pub fn record_removed(count: u64) {
    if let Some(counter) = REMOVED_TOTAL.as_ref() {
        counter.inc_by(count);
    }
}

pub fn record_failed(count: u64) {
    if let Some(counter) = FAILED_TOTAL.as_ref() {
        counter.inc_by(count);
    }
}

pub fn record_cleanup_duration(duration: Duration) {
    if let Some(histogram) = CLEANUP_DURATION_SECONDS.as_ref() {
        histogram.observe(duration.as_secs_f64());
    }
}
