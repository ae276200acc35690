//! Keyset pagination over catalog numbers.
//!
//! Pages are ordered by catalog number ascending and a cursor means "resume
//! strictly after this id". Unlike offsets, rows inserted or deleted behind the
//! cursor never shift the next page.

use serde::Serialize;

use crate::error::{CatalogError, Result};
use crate::tle::{CatalogId, TleRecord};

pub const DEFAULT_LIMIT: u32 = 100;

/// What to ask storage for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    pub after: Option<CatalogId>,
    pub limit: u32,
}

impl PagePlan {
    pub fn new(limit: Option<u32>, after: Option<CatalogId>) -> Result<Self> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if limit == 0 {
            return Err(CatalogError::InvalidLimit);
        }
        Ok(PagePlan { after, limit })
    }

    /// Whether a row passes the `catalog_id > after` filter.
    pub fn admits(&self, id: CatalogId) -> bool {
        self.after.map_or(true, |after| id > after)
    }

    /// Cursor for the following page. A short page means the listing ended.
    pub fn next_cursor(&self, rows: &[TleRecord]) -> Option<PagePlan> {
        if rows.len() != self.limit as usize {
            return None;
        }
        rows.last().map(|last| PagePlan {
            after: Some(last.catalog_id),
            limit: self.limit,
        })
    }

    /// Resource reference for this plan, as handed out in `next`.
    pub fn href(&self) -> String {
        match self.after {
            Some(after) => format!("/satellites?limit={}&after={}", self.limit, after),
            None => format!("/satellites?limit={}", self.limit),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteItem {
    pub norad_cat_id: CatalogId,
    pub tle_name: Option<String>,
}

impl From<&TleRecord> for SatelliteItem {
    fn from(rec: &TleRecord) -> Self {
        SatelliteItem {
            norad_cat_id: rec.catalog_id,
            tle_name: rec.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub items: Vec<SatelliteItem>,
    /// Size of the whole collection, not of the filtered remainder.
    pub total_items: usize,
    pub next: Option<String>,
}

impl Page {
    pub fn build(plan: &PagePlan, rows: &[TleRecord], total_items: usize) -> Self {
        Page {
            items: rows.iter().map(SatelliteItem::from).collect(),
            total_items,
            next: plan.next_cursor(rows).map(|p| p.href()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(ids: std::ops::RangeInclusive<CatalogId>) -> Vec<TleRecord> {
        ids.map(|id| TleRecord {
            catalog_id: id,
            name: Some(format!("SAT {id}")),
            line1: format!("1 {id:05}U"),
            line2: format!("2 {id:05}"),
        })
        .collect()
    }

    fn fetch(all: &[TleRecord], plan: &PagePlan) -> Vec<TleRecord> {
        all.iter()
            .filter(|r| plan.admits(r.catalog_id))
            .take(plan.limit as usize)
            .cloned()
            .collect()
    }

    #[test]
    fn defaults() {
        let plan = PagePlan::new(None, None).unwrap();
        assert_eq!(plan.limit, 100);
        assert_eq!(plan.after, None);
        assert!(plan.admits(0));
    }

    #[test]
    fn zero_limit_rejected() {
        assert!(matches!(PagePlan::new(Some(0), None), Err(CatalogError::InvalidLimit)));
    }

    #[test]
    fn after_is_exclusive() {
        let plan = PagePlan::new(Some(10), Some(100)).unwrap();
        assert!(!plan.admits(100));
        assert!(plan.admits(101));
    }

    #[test]
    fn walks_250_rows_in_three_pages() {
        let all = rows(1..=250);

        let first = PagePlan::new(Some(100), None).unwrap();
        let got = fetch(&all, &first);
        let page = Page::build(&first, &got, all.len());
        assert_eq!(page.items.first().unwrap().norad_cat_id, 1);
        assert_eq!(page.items.last().unwrap().norad_cat_id, 100);
        assert_eq!(page.total_items, 250);
        assert_eq!(page.next.as_deref(), Some("/satellites?limit=100&after=100"));

        let second = first.next_cursor(&got).unwrap();
        assert_eq!(second.after, Some(100));
        let got = fetch(&all, &second);
        let page = Page::build(&second, &got, all.len());
        assert_eq!(page.items.first().unwrap().norad_cat_id, 101);
        assert_eq!(page.items.last().unwrap().norad_cat_id, 200);
        assert_eq!(page.next.as_deref(), Some("/satellites?limit=100&after=200"));

        let third = second.next_cursor(&got).unwrap();
        let got = fetch(&all, &third);
        let page = Page::build(&third, &got, all.len());
        assert_eq!(page.items.len(), 50);
        assert_eq!(page.items.last().unwrap().norad_cat_id, 250);
        assert_eq!(page.total_items, 250);
        assert_eq!(page.next, None);
    }

    #[test]
    fn empty_page_has_no_next() {
        let plan = PagePlan::new(Some(5), Some(1000)).unwrap();
        let page = Page::build(&plan, &[], 3);
        assert!(page.items.is_empty());
        assert_eq!(page.next, None);
        assert_eq!(page.total_items, 3);
    }

    #[test]
    fn serializes_camel_case() {
        let plan = PagePlan::new(Some(1), None).unwrap();
        let page = Page::build(&plan, &rows(7..=7), 1);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "items": [{ "noradCatId": 7, "tleName": "SAT 7" }],
                "totalItems": 1,
                "next": "/satellites?limit=1&after=7"
            })
        );
    }
}
