//! HTTP surface.
//!
//! - `GET /tle` - whole catalog as text
//! - `GET /tle/refresh` - fetch the feed and replace the catalog
//! - `GET /satellites` - keyset-paginated listing
//! - `GET /satellites/norad-cat-id/:norad_cat_id/tle` - one record as text
//! - `GET /health/db` - storage round-trip

pub mod error;
mod routes;

use std::sync::Arc;

use anyhow::Context;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Settings;
use crate::refresh::RefreshLock;
use crate::store::TleStore;

/// Shared state for all handlers.
pub struct AppState {
    pub settings: Settings,
    pub store: Arc<dyn TleStore>,
    pub client: reqwest::Client,
    pub refresh_lock: RefreshLock,
}

impl AppState {
    pub fn new(settings: Settings, store: Arc<dyn TleStore>, client: reqwest::Client) -> Self {
        AppState {
            settings,
            store,
            client,
            refresh_lock: RefreshLock::default(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/tle", get(routes::list_tle))
        .route("/tle/refresh", get(routes::refresh_tle))
        .route("/satellites", get(routes::list_satellites))
        .route(
            "/satellites/norad-cat-id/:norad_cat_id/tle",
            get(routes::get_satellite_tle),
        )
        .route("/health/db", get(routes::health_db))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: Arc<AppState>, bind: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!(addr = %listener.local_addr()?, "Listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
