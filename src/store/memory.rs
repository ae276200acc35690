use std::collections::BTreeMap;
use std::sync::Mutex;

use super::TleStore;
use crate::error::Result;
use crate::tle::{CatalogId, TleRecord};

/// Map-backed store for exercising handlers without SQLite.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<BTreeMap<CatalogId, TleRecord>>,
}

impl MemoryStore {
    pub fn with_records(records: impl IntoIterator<Item = TleRecord>) -> Self {
        let store = MemoryStore::default();
        store
            .rows
            .lock()
            .unwrap()
            .extend(records.into_iter().map(|r| (r.catalog_id, r)));
        store
    }
}

impl TleStore for MemoryStore {
    fn delete_all(&self) -> Result<usize> {
        let mut rows = self.rows.lock().unwrap();
        let n = rows.len();
        rows.clear();
        Ok(n)
    }

    fn insert_batch(&self, batch: &[TleRecord]) -> Result<usize> {
        let mut rows = self.rows.lock().unwrap();
        for r in batch {
            rows.insert(r.catalog_id, r.clone());
        }
        Ok(batch.len())
    }

    fn query_page(&self, after: Option<CatalogId>, limit: usize) -> Result<(Vec<TleRecord>, usize)> {
        use std::ops::Bound::{Excluded, Unbounded};

        let rows = self.rows.lock().unwrap();
        let lower = after.map_or(Unbounded, Excluded);
        let page = rows
            .range((lower, Unbounded))
            .take(limit)
            .map(|(_, r)| r.clone())
            .collect();
        Ok((page, rows.len()))
    }

    fn find_by_id(&self, id: CatalogId) -> Result<Option<TleRecord>> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    fn all(&self) -> Result<Vec<TleRecord>> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.rows.lock().unwrap().len())
    }

    fn ping(&self) -> Result<()> {
        Ok(())
    }
}
