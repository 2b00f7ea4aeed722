use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, put},
    Router,
};
use dotenvy::dotenv;
use handlers::{
    get_columns_handler, get_table_handler, health_check, list_tables_handler,
    put_snapshot_handler,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer};

use crate::config::ServerConfig;
use crate::lineage::GraphSnapshot;

pub mod handlers;
pub mod models;

pub struct AppState {
    /// Current full snapshot; replaced wholesale, never patched
    pub snapshot: RwLock<Option<Arc<GraphSnapshot>>>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        AppState {
            snapshot: RwLock::new(None),
            config,
        }
    }

    pub fn with_snapshot(config: ServerConfig, snapshot: GraphSnapshot) -> Self {
        AppState {
            snapshot: RwLock::new(Some(Arc::new(snapshot))),
            config,
        }
    }
}

pub fn router(app_state: Arc<AppState>) -> Router {
    let max_body_bytes = app_state.config.max_body_bytes;
    let timeout = Duration::from_secs(app_state.config.request_timeout_secs);

    Router::new()
        .route("/health", get(health_check))
        .route("/snapshot", put(put_snapshot_handler))
        .route("/tables", get(list_tables_handler))
        .route("/tables/{id}", get(get_table_handler))
        .route("/tables/{id}/columns", get(get_columns_handler))
        .with_state(app_state)
        .layer(DefaultBodyLimit::disable())
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::new())
                .layer(RequestBodyLimitLayer::new(max_body_bytes))
                .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)),
        )
}

pub async fn run() {
    dotenv().ok();

    // Load server configuration from environment variables
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    run_with_config(config).await;
}

pub async fn run_with_config(config: ServerConfig) {
    log::info!(
        "Server configuration: http={}:{}, route_prefix={:?}, max_body_bytes={}, timeout={}s",
        config.http_host,
        config.http_port,
        config.route_prefix,
        config.max_body_bytes,
        config.request_timeout_secs
    );

    let app_state = match config.snapshot_path.as_deref() {
        Some(path) => match GraphSnapshot::from_file(path) {
            Ok(snapshot) => AppState::with_snapshot(config.clone(), snapshot),
            Err(e) => {
                log::error!("✗ Failed to load snapshot: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            log::warn!("No snapshot configured; waiting for PUT /snapshot");
            AppState::new(config.clone())
        }
    };

    let http_bind_address = format!("{}:{}", config.http_host, config.http_port);
    log::info!("Starting HTTP server on {}", http_bind_address);

    let app = router(Arc::new(app_state));

    let http_listener = match TcpListener::bind(&http_bind_address).await {
        Ok(listener) => {
            log::info!("Successfully bound HTTP listener to {}", http_bind_address);
            listener
        }
        Err(e) => {
            log::error!(
                "Failed to bind HTTP listener to {}: {}",
                http_bind_address,
                e
            );
            log::error!("  Is another process using port {}?", config.http_port);
            std::process::exit(1);
        }
    };

    let http_server = axum::serve(http_listener, app);
    println!("tablegraph server is running");
    println!("  HTTP API: http://{}", http_bind_address);

    if config.daemon {
        println!("Running in daemon mode - press Ctrl+C to stop");

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let (mut sigterm, mut sigint) =
                match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                    (Ok(term), Ok(int)) => (term, int),
                    (Err(e), _) | (_, Err(e)) => {
                        log::error!("Failed to register signal handlers: {}. Server will run without graceful shutdown.", e);
                        if let Err(e) = http_server.await {
                            log::error!("HTTP server error: {:?}", e);
                        }
                        return;
                    }
                };

            tokio::select! {
                result = http_server => {
                    if let Err(e) = result {
                        log::error!("HTTP server error: {:?}", e);
                    }
                }
                _ = sigterm.recv() => println!("Received SIGTERM, shutting down..."),
                _ = sigint.recv() => println!("Received SIGINT, shutting down..."),
            }
        }

        #[cfg(windows)]
        {
            tokio::select! {
                result = http_server => {
                    if let Err(e) = result {
                        log::error!("HTTP server error: {:?}", e);
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    println!("Received shutdown signal, shutting down...");
                }
            }
        }

        println!("Server stopped");
    } else if let Err(e) = http_server.await {
        log::error!("HTTP server fatal error: {:?}", e);
        std::process::exit(1);
    }
}
