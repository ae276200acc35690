use thiserror::Error;

use crate::tle::CatalogId;

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to fetch feed {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("feed {url} answered with status {status}")]
    FetchStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("malformed feed: {0}")]
    MalformedFeed(#[from] serde_json::Error),

    #[error("no TLE found for catalog id {0}")]
    NotFound(CatalogId),

    #[error("storage failure: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("refresh task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("a refresh is already in progress")]
    RefreshInProgress,

    #[error("limit must be a positive integer")]
    InvalidLimit,
}
