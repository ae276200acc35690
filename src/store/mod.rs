#[cfg(test)]
pub mod memory;
pub mod sqlite;

pub use sqlite::SqliteStore;

use serde::Serialize;

use crate::batch::{batches, BatchSize};
use crate::error::Result;
use crate::tle::{CatalogId, TleRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplaceStats {
    pub deleted: usize,
    pub inserted: usize,
    pub batches: usize,
}

/// Persisted TLE catalog. Reads see snapshots; only refresh writes.
pub trait TleStore: Send + Sync {
    fn delete_all(&self) -> Result<usize>;

    /// Insert one batch in a single transaction. A repeated id replaces the row.
    fn insert_batch(&self, batch: &[TleRecord]) -> Result<usize>;

    /// Rows with `catalog_id > after`, ascending, at most `limit`, plus the
    /// size of the whole collection.
    fn query_page(&self, after: Option<CatalogId>, limit: usize) -> Result<(Vec<TleRecord>, usize)>;

    fn find_by_id(&self, id: CatalogId) -> Result<Option<TleRecord>>;

    /// Every row ordered by catalog number.
    fn all(&self) -> Result<Vec<TleRecord>>;

    fn count(&self) -> Result<usize>;

    fn ping(&self) -> Result<()>;

    fn replace_all(&self, records: &[TleRecord], batch_size: BatchSize) -> Result<ReplaceStats> {
        self.replace_all_with_progress(records, batch_size, &mut |_| {})
    }

    /// Delete everything, then insert in batches, calling `on_batch` with the
    /// size of each committed batch. Not atomic as a whole: a concurrent reader
    /// may see an empty or partially filled catalog until the last batch lands.
    fn replace_all_with_progress(
        &self,
        records: &[TleRecord],
        batch_size: BatchSize,
        on_batch: &mut dyn FnMut(usize),
    ) -> Result<ReplaceStats> {
        replace_batched(
            || self.delete_all(),
            |chunk| self.insert_batch(chunk),
            records,
            batch_size,
            on_batch,
        )
    }
}

/// Delete everything, then insert `records` in chunks of `batch_size`, one
/// `insert` call per chunk. Shared by every replace-on-refresh table.
pub(crate) fn replace_batched<T>(
    delete: impl FnOnce() -> Result<usize>,
    mut insert: impl FnMut(&[T]) -> Result<usize>,
    records: &[T],
    batch_size: BatchSize,
    on_batch: &mut dyn FnMut(usize),
) -> Result<ReplaceStats> {
    let mut stats = ReplaceStats {
        deleted: delete()?,
        ..ReplaceStats::default()
    };
    for chunk in batches(records, batch_size) {
        stats.inserted += insert(chunk)?;
        stats.batches += 1;
        on_batch(chunk.len());
    }
    Ok(stats)
}
