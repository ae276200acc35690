use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::Context;
use rusqlite::{Connection, OptionalExtension};

use super::{replace_batched, ReplaceStats, TleStore};
use crate::batch::BatchSize;
use crate::error::Result;
use crate::omm::OmmRecord;
use crate::tle::{CatalogId, TleRecord};

const TLE_COLUMNS: &str = "norad_cat_id, name, line1, line2";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {:?}", dir))?;
        }
        let conn = Connection::open(path).with_context(|| format!("Failed to open {:?}", path))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> anyhow::Result<Self> {
        init_schema(&conn)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // A panic mid-statement leaves nothing half-applied outside a transaction.
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ── OMM ──

    pub fn replace_satellites(
        &self,
        records: &[OmmRecord],
        batch_size: BatchSize,
    ) -> Result<ReplaceStats> {
        replace_batched(
            || Ok(self.conn().execute("DELETE FROM satellites", [])?),
            |chunk| self.insert_satellites(chunk),
            records,
            batch_size,
            &mut |_| {},
        )
    }

    fn insert_satellites(&self, rows: &[OmmRecord]) -> Result<usize> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO satellites
                 (object_name, object_id, epoch, mean_motion, eccentricity, inclination,
                  ra_of_asc_node, arg_of_pericenter, mean_anomaly, ephemeris_type,
                  classification_type, norad_cat_id, element_set_no, rev_at_epoch,
                  bstar, mean_motion_dot, mean_motion_ddot)
                 VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17)",
            )?;
            for r in rows {
                count += stmt.execute(rusqlite::params![
                    r.object_name, r.object_id, r.epoch, r.mean_motion, r.eccentricity,
                    r.inclination, r.ra_of_asc_node, r.arg_of_pericenter, r.mean_anomaly,
                    r.ephemeris_type, r.classification_type, r.norad_cat_id, r.element_set_no,
                    r.rev_at_epoch, r.bstar, r.mean_motion_dot, r.mean_motion_ddot,
                ])?;
            }
        }
        tx.commit()?;
        Ok(count)
    }

    pub fn count_satellites(&self) -> Result<usize> {
        Ok(self
            .conn()
            .query_row("SELECT COUNT(*) FROM satellites", [], |r| r.get(0))?)
    }
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS tle (
            norad_cat_id INTEGER PRIMARY KEY,
            name         TEXT,
            line1        TEXT NOT NULL,
            line2        TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS satellites (
            object_name         TEXT,
            object_id           TEXT,
            epoch               TEXT,
            mean_motion         REAL,
            eccentricity        REAL,
            inclination         REAL,
            ra_of_asc_node      REAL,
            arg_of_pericenter   REAL,
            mean_anomaly        REAL,
            ephemeris_type      INTEGER,
            classification_type TEXT,
            norad_cat_id        INTEGER NOT NULL UNIQUE,
            element_set_no      INTEGER,
            rev_at_epoch        INTEGER,
            bstar               REAL,
            mean_motion_dot     REAL,
            mean_motion_ddot    REAL
        );
        ",
    )
}

fn tle_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TleRecord> {
    Ok(TleRecord {
        catalog_id: row.get(0)?,
        name: row.get(1)?,
        line1: row.get(2)?,
        line2: row.get(3)?,
    })
}

impl TleStore for SqliteStore {
    fn delete_all(&self) -> Result<usize> {
        Ok(self.conn().execute("DELETE FROM tle", [])?)
    }

    fn insert_batch(&self, batch: &[TleRecord]) -> Result<usize> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO tle (norad_cat_id, name, line1, line2)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for r in batch {
                count += stmt.execute(rusqlite::params![r.catalog_id, r.name, r.line1, r.line2])?;
            }
        }
        tx.commit()?;
        Ok(count)
    }

    fn query_page(&self, after: Option<CatalogId>, limit: usize) -> Result<(Vec<TleRecord>, usize)> {
        let conn = self.conn();

        let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
        let where_clause = match after {
            Some(id) => {
                params.push(Box::new(id));
                " WHERE norad_cat_id > ?1".to_string()
            }
            None => String::new(),
        };
        let sql = format!(
            "SELECT {TLE_COLUMNS} FROM tle{} ORDER BY norad_cat_id LIMIT {}",
            where_clause, limit
        );

        let mut stmt = conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::types::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let rows = stmt
            .query_map(param_refs.as_slice(), tle_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let total: usize = conn.query_row("SELECT COUNT(*) FROM tle", [], |r| r.get(0))?;
        Ok((rows, total))
    }

    fn find_by_id(&self, id: CatalogId) -> Result<Option<TleRecord>> {
        Ok(self
            .conn()
            .query_row(
                &format!("SELECT {TLE_COLUMNS} FROM tle WHERE norad_cat_id = ?1"),
                [id],
                tle_from_row,
            )
            .optional()?)
    }

    fn all(&self) -> Result<Vec<TleRecord>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("SELECT {TLE_COLUMNS} FROM tle ORDER BY norad_cat_id"))?;
        let rows = stmt
            .query_map([], tle_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn count(&self) -> Result<usize> {
        Ok(self.conn().query_row("SELECT COUNT(*) FROM tle", [], |r| r.get(0))?)
    }

    fn ping(&self) -> Result<()> {
        self.conn().query_row("SELECT 1", [], |r| r.get::<_, i64>(0))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: CatalogId, name: Option<&str>) -> TleRecord {
        TleRecord {
            catalog_id: id,
            name: name.map(str::to_string),
            line1: format!("1 {id:05}U 98067A   24001.50000000"),
            line2: format!("2 {id:05}  51.6416 247.4627"),
        }
    }

    fn store_with(ids: impl IntoIterator<Item = CatalogId>) -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        let recs: Vec<_> = ids.into_iter().map(|id| rec(id, Some("SAT"))).collect();
        store.replace_all(&recs, BatchSize::new(7).unwrap()).unwrap();
        store
    }

    #[test]
    fn replace_counts_batches() {
        let store = store_with(1..=20);
        let recs: Vec<_> = (100..110).map(|id| rec(id, None)).collect();
        let stats = store.replace_all(&recs, BatchSize::new(4).unwrap()).unwrap();
        assert_eq!(stats, ReplaceStats { deleted: 20, inserted: 10, batches: 3 });
        assert_eq!(store.count().unwrap(), 10);
        assert!(store.find_by_id(1).unwrap().is_none());
    }

    #[test]
    fn progress_sees_each_batch() {
        let store = SqliteStore::open_in_memory().unwrap();
        let recs: Vec<_> = (1..=5).map(|id| rec(id, None)).collect();
        let mut seen = Vec::new();
        store
            .replace_all_with_progress(&recs, BatchSize::new(2).unwrap(), &mut |n| seen.push(n))
            .unwrap();
        assert_eq!(seen, vec![2, 2, 1]);
    }

    #[test]
    fn pages_by_cursor() {
        let store = store_with(1..=250);

        let (rows, total) = store.query_page(None, 100).unwrap();
        assert_eq!(total, 250);
        assert_eq!(rows.len(), 100);
        assert_eq!(rows[0].catalog_id, 1);
        assert_eq!(rows[99].catalog_id, 100);

        let (rows, _) = store.query_page(Some(200), 100).unwrap();
        assert_eq!(rows.len(), 50);
        assert_eq!(rows[0].catalog_id, 201);
    }

    #[test]
    fn cursor_survives_deletes_behind_it() {
        let store = store_with((1..=10).chain(20..=30));
        let (first, _) = store.query_page(None, 5).unwrap();
        let cursor = first.last().unwrap().catalog_id;

        let keep: Vec<_> = (6..=10).chain(20..=30).map(|id| rec(id, Some("SAT"))).collect();
        store.replace_all(&keep, BatchSize::default()).unwrap();

        let (rows, total) = store.query_page(Some(cursor), 5).unwrap();
        assert_eq!(total, 16);
        let ids: Vec<_> = rows.iter().map(|r| r.catalog_id).collect();
        assert_eq!(ids, vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn find_round_trips_fields() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.insert_batch(&[rec(25544, Some("ISS (ZARYA)")), rec(5, None)]).unwrap();
        assert_eq!(store.find_by_id(25544).unwrap(), Some(rec(25544, Some("ISS (ZARYA)"))));
        assert_eq!(store.find_by_id(5).unwrap().unwrap().name, None);
        assert_eq!(store.find_by_id(999999).unwrap(), None);
    }

    #[test]
    fn duplicate_id_keeps_last() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .replace_all(&[rec(5, Some("OLD")), rec(5, Some("NEW"))], BatchSize::new(1).unwrap())
            .unwrap();
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.find_by_id(5).unwrap().unwrap().name.as_deref(), Some("NEW"));
    }

    #[test]
    fn all_is_ordered() {
        let store = store_with([30, 10, 20]);
        let ids: Vec<_> = store.all().unwrap().iter().map(|r| r.catalog_id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
        store.ping().unwrap();
    }

    #[test]
    fn satellites_replace() {
        let store = SqliteStore::open_in_memory().unwrap();
        let recs = crate::omm::parse_omm(
            r#"[{"NORAD_CAT_ID": 25544, "OBJECT_NAME": "ISS"}, {"NORAD_CAT_ID": 5}, {"NORAD_CAT_ID": 5, "BSTAR": 0.1}]"#,
        )
        .unwrap();
        let stats = store.replace_satellites(&recs, BatchSize::new(2).unwrap()).unwrap();
        assert_eq!(stats.batches, 2);
        assert_eq!(store.count_satellites().unwrap(), 2);

        let stats = store.replace_satellites(&recs[..1], BatchSize::default()).unwrap();
        assert_eq!(stats.deleted, 2);
        assert_eq!(store.count_satellites().unwrap(), 1);
    }

    #[test]
    fn open_creates_parent_dir() {
        let dir = std::env::temp_dir().join(format!("tle_catalog_test_{}", std::process::id()));
        let path = dir.join("nested").join("tle.sqlite");
        let store = SqliteStore::open(&path).unwrap();
        store.ping().unwrap();
        drop(store);
        assert!(path.exists());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
