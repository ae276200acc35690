use serde::Serialize;

use crate::error::Result;
use crate::parser::{catalog_id, RawTle};

/// NORAD catalog number. Alpha-5 identifiers resolve to values up to 339999.
pub type CatalogId = u32;

/// One assembled element set, keyed by its catalog number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TleRecord {
    pub catalog_id: CatalogId,
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
}

impl TleRecord {
    /// Attach the catalog number parsed from line 1.
    pub fn from_raw(raw: RawTle) -> Result<Self> {
        let catalog_id = catalog_id::extract(&raw.line1)?;
        Ok(TleRecord {
            catalog_id,
            name: raw.name,
            line1: raw.line1,
            line2: raw.line2,
        })
    }

    /// Three lines, no trailing newline. A missing name renders as an empty line,
    /// which reads back as an empty name.
    pub fn render(&self) -> String {
        format!(
            "{}\n{}\n{}",
            self.name.as_deref().unwrap_or(""),
            self.line1,
            self.line2
        )
    }
}

/// The `GET /tle` body: every record rendered and joined by newlines.
pub fn render_catalog(records: &[TleRecord]) -> String {
    records
        .iter()
        .map(TleRecord::render)
        .collect::<Vec<_>>()
        .join("\n")
}
