use std::collections::HashSet;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lineage::SnapshotError;

#[derive(Debug, Default, Deserialize)]
pub struct TablesQuery {
    /// Case-insensitive substring filter on table names
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ColumnsQuery {
    /// Case-insensitive substring filter on column names
    pub search: Option<String>,
    /// Comma-separated column ids whose requirement rows are shown
    pub expanded: Option<String>,
}

impl ColumnsQuery {
    pub fn expanded_ids(&self) -> HashSet<String> {
        self.expanded
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct SnapshotSummary {
    pub nodes: usize,
    pub edges: usize,
    pub tables: usize,
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("No snapshot loaded; PUT /snapshot first")]
    NoSnapshot,
    #[error("Node `{id}` not found in snapshot")]
    TableNotFound { id: String },
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(#[from] SnapshotError),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::NoSnapshot => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::TableNotFound { .. } => StatusCode::NOT_FOUND,
            ServerError::InvalidSnapshot(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::warn!("{}", self);
        } else {
            log::debug!("Request rejected: {}", self);
        }
        (
            status,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
