use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

use crate::batch::BatchSize;
use crate::error::{CatalogError, Result};
use crate::parser::parse_catalog;
use crate::store::TleStore;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReport {
    pub parsed: usize,
    pub malformed: usize,
    pub deleted: usize,
    pub inserted: usize,
    pub batches: usize,
    /// Rows in the catalog afterwards. Below `inserted` when the feed repeats
    /// a catalog number.
    pub stored: usize,
    pub completed_at: DateTime<Utc>,
}

/// Single-flight guard: two interleaved delete/insert sequences would mix
/// their batches, so a second refresh is refused while one runs.
#[derive(Default)]
pub struct RefreshLock(Mutex<()>);

impl RefreshLock {
    pub fn try_acquire(&self) -> Result<MutexGuard<'_, ()>> {
        self.0.try_lock().map_err(|_| CatalogError::RefreshInProgress)
    }
}

/// Run [`ingest`] on the blocking pool so a large replace does not hold an
/// async worker for the whole insert.
pub async fn ingest_blocking(
    store: Arc<dyn TleStore>,
    raw: String,
    batch_size: BatchSize,
) -> Result<RefreshReport> {
    tokio::task::spawn_blocking(move || ingest(store.as_ref(), &raw, batch_size)).await?
}

/// Parse a raw text feed and replace the stored catalog with it.
pub fn ingest(store: &dyn TleStore, raw: &str, batch_size: BatchSize) -> Result<RefreshReport> {
    ingest_with_progress(store, raw, batch_size, &mut |_| {})
}

pub fn ingest_with_progress(
    store: &dyn TleStore,
    raw: &str,
    batch_size: BatchSize,
    on_batch: &mut dyn FnMut(usize),
) -> Result<RefreshReport> {
    let parsed = parse_catalog(raw);
    info!(
        records = parsed.records.len(),
        malformed = parsed.malformed,
        "Parsed TLE feed"
    );

    let stats = store.replace_all_with_progress(&parsed.records, batch_size, on_batch)?;
    let stored = store.count()?;
    info!(
        deleted = stats.deleted,
        inserted = stats.inserted,
        batches = stats.batches,
        stored,
        "Replaced TLE catalog"
    );

    Ok(RefreshReport {
        parsed: parsed.records.len(),
        malformed: parsed.malformed,
        deleted: stats.deleted,
        inserted: stats.inserted,
        batches: stats.batches,
        stored,
        completed_at: Utc::now(),
    })
}
