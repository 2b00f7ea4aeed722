use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};

use crate::lineage::{ColumnListing, ColumnListingOptions, GraphSnapshot, Table};

use super::{
    models::{ColumnsQuery, ServerError, SnapshotSummary, TablesQuery},
    AppState,
};

/// Simple health check endpoint
pub async fn health_check(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let loaded = app_state.snapshot.read().await.is_some();
    Json(serde_json::json!({
        "service": "tablegraph",
        "status": "healthy",
        "snapshot_loaded": loaded,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn current_snapshot(app_state: &AppState) -> Result<Arc<GraphSnapshot>, ServerError> {
    app_state
        .snapshot
        .read()
        .await
        .clone()
        .ok_or(ServerError::NoSnapshot)
}

/// Replace the whole snapshot; derived tables are recomputed on every read
pub async fn put_snapshot_handler(
    State(app_state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<SnapshotSummary>, ServerError> {
    let start_time = Instant::now();
    let snapshot = GraphSnapshot::from_json_str(&body)?;
    let summary = SnapshotSummary {
        nodes: snapshot.nodes().len(),
        edges: snapshot.edges().len(),
        tables: snapshot.table_count(),
    };

    *app_state.snapshot.write().await = Some(Arc::new(snapshot));
    log::info!(
        "Snapshot replaced: {} nodes, {} edges, {} tables ({:.2}ms)",
        summary.nodes,
        summary.edges,
        summary.tables,
        start_time.elapsed().as_secs_f64() * 1000.0
    );
    Ok(Json(summary))
}

pub async fn list_tables_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<TablesQuery>,
) -> Result<Json<Vec<Table>>, ServerError> {
    let snapshot = current_snapshot(&app_state).await?;
    log::debug!("Listing tables (search: {:?})", query.search);
    Ok(Json(snapshot.tables_matching(query.search.as_deref())))
}

pub async fn get_table_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Table>, ServerError> {
    let snapshot = current_snapshot(&app_state).await?;
    log::debug!("Resolving table {}", id);
    snapshot
        .table(&id)
        .map(Json)
        .ok_or(ServerError::TableNotFound { id })
}

pub async fn get_columns_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<ColumnsQuery>,
) -> Result<Json<ColumnListing>, ServerError> {
    let snapshot = current_snapshot(&app_state).await?;
    let expanded = query.expanded_ids();
    let options = ColumnListingOptions {
        search: query.search.as_deref(),
        expanded: &expanded,
        route_prefix: &app_state.config.route_prefix,
    };
    snapshot
        .column_listing(&id, &options)
        .map(Json)
        .ok_or(ServerError::TableNotFound { id })
}
