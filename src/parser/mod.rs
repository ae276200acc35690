pub mod assembler;
pub mod catalog_id;
pub mod lines;

pub use assembler::{split_records, RawTle};

use tracing::warn;

use crate::tle::TleRecord;

pub struct ParsedCatalog {
    pub records: Vec<TleRecord>,
    pub malformed: usize,
}

/// Two-pass pipeline: lines → raw triples → records with catalog numbers.
/// Records whose catalog number cannot be read are logged and skipped.
pub fn parse_catalog(raw: &str) -> ParsedCatalog {
    let mut records = Vec::new();
    let mut malformed = 0;

    for triple in split_records(raw) {
        let name = triple.name.clone();
        match TleRecord::from_raw(triple) {
            Ok(rec) => records.push(rec),
            Err(e) => {
                malformed += 1;
                warn!(name = ?name, error = %e, "Dropping malformed TLE");
            }
        }
    }

    ParsedCatalog { records, malformed }
}
