//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both the
//! production server and integration tests.

use axum::{
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::rendering::watermark::Watermark;
use crate::services::{ConfigStore, ConvertPipeline, PageCapture};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub capture: Arc<dyn PageCapture>,
    pub pipeline: Arc<ConvertPipeline>,
    pub config_store: Arc<ConfigStore>,
}

/// Create application state with the given capture backend.
///
/// The capture is injected so integration tests can run the full router
/// without a browser.
pub fn create_app_state(
    config_path: impl Into<PathBuf>,
    capture: Arc<dyn PageCapture>,
) -> AppState {
    let config_store = Arc::new(ConfigStore::new(config_path));
    if let Err(e) = config_store.init() {
        tracing::warn!(%e, "Failed to initialize config file");
    }

    AppState {
        capture,
        pipeline: Arc::new(ConvertPipeline::new(Watermark::from_env())),
        config_store,
    }
}

/// Build the API router with all endpoints and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/render", post(api::handle_render))
        .route("/preview", get(api::handle_preview))
        .route(
            "/config",
            get(api::handle_get_config).post(api::handle_set_config),
        )
        // Health check
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
