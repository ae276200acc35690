//! HTTP mapping for catalog errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::error::CatalogError;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => {
                ApiError::new(StatusCode::NOT_FOUND, "No TLE found for this satellite")
            }
            CatalogError::InvalidLimit => ApiError::new(StatusCode::BAD_REQUEST, err.to_string()),
            CatalogError::RefreshInProgress => ApiError::new(StatusCode::CONFLICT, err.to_string()),
            CatalogError::Fetch { .. } | CatalogError::FetchStatus { .. } => {
                error!(error = %err, "Feed fetch failed");
                ApiError::new(StatusCode::BAD_GATEWAY, err.to_string())
            }
            CatalogError::MalformedFeed(_) | CatalogError::MalformedRecord(_) => {
                error!(error = %err, "Feed could not be parsed");
                ApiError::new(StatusCode::BAD_GATEWAY, err.to_string())
            }
            CatalogError::Storage(_) | CatalogError::Task(_) => {
                error!(error = %err, "Storage failure");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "storage failure")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiErrorBody { error: self.message })).into_response()
    }
}
