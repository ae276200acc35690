use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::ApiError;
use super::AppState;
use crate::error::CatalogError;
use crate::feed;
use crate::pagination::{Page, PagePlan};
use crate::refresh::{self, RefreshReport};
use crate::tle::{render_catalog, CatalogId};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<u32>,
    pub after: Option<CatalogId>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /tle
pub async fn list_tle(State(state): State<Arc<AppState>>) -> Result<String, ApiError> {
    let records = state.store.all()?;
    debug!(records = records.len(), "Rendering catalog");
    Ok(render_catalog(&records))
}

/// GET /tle/refresh
///
/// Nothing is deleted until the feed has been fetched in full.
pub async fn refresh_tle(State(state): State<Arc<AppState>>) -> Result<Json<RefreshReport>, ApiError> {
    let _guard = state.refresh_lock.try_acquire()?;
    let raw = feed::fetch_text(&state.client, &state.settings.feed_url).await?;
    let report =
        refresh::ingest_blocking(state.store.clone(), raw, state.settings.batch_size).await?;
    info!(inserted = report.inserted, malformed = report.malformed, "Refresh complete");
    Ok(Json(report))
}

/// GET /satellites?limit=&after=
pub async fn list_satellites(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Page>, ApiError> {
    let plan = PagePlan::new(params.limit, params.after)?;
    let (rows, total) = state.store.query_page(plan.after, plan.limit as usize)?;
    Ok(Json(Page::build(&plan, &rows, total)))
}

/// GET /satellites/norad-cat-id/:norad_cat_id/tle
pub async fn get_satellite_tle(
    State(state): State<Arc<AppState>>,
    Path(norad_cat_id): Path<CatalogId>,
) -> Result<String, ApiError> {
    let record = state
        .store
        .find_by_id(norad_cat_id)?
        .ok_or(CatalogError::NotFound(norad_cat_id))?;
    Ok(format!("{}\n", record.render()))
}

/// GET /health/db
pub async fn health_db(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    state.store.ping()?;
    Ok(Json(HealthResponse { status: "ok" }))
}
