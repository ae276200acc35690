use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tle::CatalogId;

/// One CelesTrak-style OMM object from the JSON feed. Only the catalog
/// number is required; everything else is stored as-is or NULL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct OmmRecord {
    pub object_name: Option<String>,
    pub object_id: Option<String>,
    pub epoch: Option<String>,
    pub mean_motion: Option<f64>,
    pub eccentricity: Option<f64>,
    pub inclination: Option<f64>,
    pub ra_of_asc_node: Option<f64>,
    pub arg_of_pericenter: Option<f64>,
    pub mean_anomaly: Option<f64>,
    pub ephemeris_type: Option<i64>,
    pub classification_type: Option<String>,
    pub norad_cat_id: CatalogId,
    pub element_set_no: Option<i64>,
    pub rev_at_epoch: Option<i64>,
    pub bstar: Option<f64>,
    pub mean_motion_dot: Option<f64>,
    pub mean_motion_ddot: Option<f64>,
}

pub fn parse_omm(json: &str) -> Result<Vec<OmmRecord>> {
    Ok(serde_json::from_str(json)?)
}
