//! File Cleaner Background Job
//!
//! Removes detached blobs from object storage. Files reach `pending_delete`
//! when a news item is edited or deleted, or when an upload could not be
//! attached. Each pass:
//!
//! 1. loads a batch of `pending_delete` files, oldest first
//! 2. removes each object from the store
//! 3. marks only the successfully removed files `hard_deleted`
//!
//! Failed removals stay pending and are retried on the next pass. This job
//! is the only writer of `hard_deleted`. On shutdown it runs one last pass.

use crate::db::file_repo;
use crate::metrics::file_cleaner as metrics;
use crate::models::File;
use portal_common::StorageError;
use s3_utils::ObjectStore;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tokio::time::{interval, MissedTickBehavior};
use uuid::Uuid;

/// Time between passes (hourly)
pub const CHECK_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Files handled per batch
pub const BATCH_SIZE: i64 = 100;

/// Outcome of one pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: u64,
    pub failed: u64,
}

pub async fn start_file_cleaner(
    db: PgPool,
    store: Arc<dyn ObjectStore>,
    mut shutdown: broadcast::Receiver<()>,
) {
    tracing::info!(
        "Starting file cleaner background job (check_interval={}m, batch_size={})",
        CHECK_INTERVAL.as_secs() / 60,
        BATCH_SIZE
    );

    let mut ticker = interval(CHECK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; the first pass runs one interval in.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                run_pass(&db, store.as_ref()).await;
            }
            _ = shutdown.recv() => {
                tracing::info!("File cleaner stopping; running final pass");
                run_pass(&db, store.as_ref()).await;
                break;
            }
        }
    }

    tracing::info!("File cleaner stopped");
}

async fn run_pass(db: &PgPool, store: &dyn ObjectStore) {
    let pass_start = Instant::now();

    match cleanup_pending_files(db, store).await {
        Ok(report) => {
            metrics::record_cleanup_run("success");
            tracing::info!(
                removed = report.removed,
                failed = report.failed,
                duration_ms = pass_start.elapsed().as_millis() as u64,
                "File cleanup pass completed"
            );
        }
        Err(e) => {
            metrics::record_cleanup_run("error");
            tracing::error!(
                error = %e,
                duration_ms = pass_start.elapsed().as_millis() as u64,
                "File cleanup pass failed"
            );
        }
    }

    metrics::record_cleanup_duration(pass_start.elapsed());
}

/// One pass over the pending files.
///
/// Files whose removal failed are skipped for the rest of the pass, so each
/// pending file is tried at most once and failures at the head of the queue
/// don't hide newer files. The pass ends on a short batch.
pub async fn cleanup_pending_files(
    db: &PgPool,
    store: &dyn ObjectStore,
) -> Result<CleanupReport, StorageError> {
    let mut report = CleanupReport::default();
    let mut failed_ids: Vec<Uuid> = Vec::new();

    loop {
        let files = file_repo::find_pending_delete(db, &failed_ids, BATCH_SIZE).await?;
        if files.is_empty() {
            break;
        }

        let (removed_ids, failed) = remove_pending_objects(store, &files).await;
        let marked = file_repo::mark_hard_deleted(db, &removed_ids).await?;

        metrics::record_removed(marked);
        metrics::record_failed(failed);
        report.removed += marked;
        report.failed += failed;

        failed_ids.extend(
            files
                .iter()
                .map(|f| f.id)
                .filter(|id| !removed_ids.contains(id)),
        );

        if (files.len() as i64) < BATCH_SIZE {
            break;
        }
    }

    Ok(report)
}

/// Remove the objects behind `files`.
///
/// Returns the ids whose object is gone (removed now or already missing)
/// and the number of removals that failed.
pub async fn remove_pending_objects(store: &dyn ObjectStore, files: &[File]) -> (Vec<Uuid>, u64) {
    let mut removed = Vec::with_capacity(files.len());
    let mut failed = 0u64;

    for file in files {
        match store.remove_object(&file.bucket_name, &file.file_name).await {
            Ok(()) => removed.push(file.id),
            Err(e) if e.is_not_found() => {
                tracing::debug!(file_id = %file.id, "Object already gone");
                removed.push(file.id);
            }
            Err(e) => {
                tracing::warn!(
                    file_id = %file.id,
                    bucket = %file.bucket_name,
                    key = %file.file_name,
                    error = %e,
                    "Failed to remove object; will retry"
                );
                failed += 1;
            }
        }
    }

    (removed, failed)
}
