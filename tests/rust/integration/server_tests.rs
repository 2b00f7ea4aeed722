//! Integration tests for the HTTP handlers over a preloaded snapshot

#[cfg(test)]
mod server_tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        extract::{Path, Query, State},
        http::{header, Request, StatusCode},
        response::IntoResponse,
        Json,
    };
    use tower::ServiceExt;
    use tablegraph::config::ServerConfig;
    use tablegraph::lineage::GraphSnapshot;
    use tablegraph::server::{
        handlers::{get_columns_handler, get_table_handler, list_tables_handler, put_snapshot_handler},
        models::{ColumnsQuery, ServerError, TablesQuery},
        router, AppState,
    };

    const SNAPSHOT: &str = r#"{
        "nodes": [
            {"id": "A", "name": "sales", "display_name": "Sales", "metadata": {"node_type": "table"}},
            {"id": "A.x", "name": "x", "display_name": "x", "metadata": null},
            {"id": "B", "name": "report", "display_name": "Report", "metadata": {"node_type": "table"}},
            {"id": "B.y", "name": "y", "display_name": "y", "metadata": null},
            {"id": "U", "name": "untyped", "display_name": "Untyped", "metadata": null},
            {"id": "U.z", "name": "z", "display_name": "z", "metadata": null}
        ],
        "edges": [
            {"id": "e1", "source": {"id": "A"}, "destination": {"id": "A.x"}, "metadata": {"constraint_type": "belongs_to"}},
            {"id": "e2", "source": {"id": "B"}, "destination": {"id": "B.y"}, "metadata": {"constraint_type": "belongs_to"}},
            {"id": "e3", "source": {"id": "A.x"}, "destination": {"id": "B.y"}, "metadata": null},
            {"id": "e4", "source": {"id": "U"}, "destination": {"id": "U.z"}, "metadata": {"constraint_type": "belongs_to"}},
            {"id": "e5", "source": {"id": "U.z"}, "destination": {"id": "A.x"}, "metadata": null}
        ]
    }"#;

    fn preloaded() -> Arc<AppState> {
        let snapshot = GraphSnapshot::from_json_str(SNAPSHOT).unwrap();
        Arc::new(AppState::with_snapshot(ServerConfig::default(), snapshot))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_router_serves_through_layers() {
        let app = router(preloaded());

        let health = app.clone().oneshot(get("/health")).await.unwrap();
        assert_eq!(health.status(), StatusCode::OK);

        let table = app.clone().oneshot(get("/tables/B")).await.unwrap();
        assert_eq!(table.status(), StatusCode::OK);

        let missing = app.oneshot(get("/tables/nope")).await.unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_router_without_snapshot_is_unavailable() {
        let app = router(Arc::new(AppState::new(ServerConfig::default())));
        let response = app.oneshot(get("/tables")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_router_rejects_oversized_snapshot() {
        let app = router(Arc::new(AppState::new(ServerConfig {
            max_body_bytes: 16,
            ..Default::default()
        })));
        let body = r#"{"nodes": [], "edges": [], "padding": "xxxxxxxx"}"#;
        let request = Request::builder()
            .method("PUT")
            .uri("/snapshot")
            .header(header::CONTENT_LENGTH, body.len())
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_search_query_filters_tables() {
        let Json(tables) = list_tables_handler(
            State(preloaded()),
            Query(TablesQuery {
                search: Some("REP".to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].id(), "B");
    }

    #[tokio::test]
    async fn test_detail_of_unclassified_node() {
        let Json(table) = get_table_handler(State(preloaded()), Path("U".to_string()))
            .await
            .unwrap();
        assert_eq!(table.columns().len(), 1);
        assert_eq!(table.destination_ids(), vec!["A"]);
    }

    #[tokio::test]
    async fn test_detail_agrees_with_listing() {
        let state = preloaded();
        let Json(tables) = list_tables_handler(State(state.clone()), Query(TablesQuery::default()))
            .await
            .unwrap();
        for listed in &tables {
            let Json(detail) = get_table_handler(State(state.clone()), Path(listed.id().to_string()))
                .await
                .unwrap();
            assert_eq!(&detail, listed);
        }
    }

    #[tokio::test]
    async fn test_snapshot_replacement_recomputes() {
        let state = preloaded();
        let Json(summary) =
            put_snapshot_handler(State(state.clone()), r#"{"nodes": [], "edges": []}"#.to_string())
                .await
                .unwrap();
        assert_eq!(summary.tables, 0);

        let Json(tables) = list_tables_handler(State(state.clone()), Query(TablesQuery::default()))
            .await
            .unwrap();
        assert!(tables.is_empty());

        let missing = get_columns_handler(
            State(state),
            Path("A".to_string()),
            Query(ColumnsQuery::default()),
        )
        .await;
        assert!(matches!(missing, Err(ServerError::TableNotFound { .. })));
    }

    #[tokio::test]
    async fn test_error_response_status() {
        let response = ServerError::TableNotFound { id: "X".to_string() }.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
    }
}
