//! Configuration endpoints.

use axum::{extract::State, response::Json};
use serde_json::json;

use crate::error::ApiError;
use crate::models::AppConfig;
use crate::server::AppState;

/// Get the persisted configuration
///
/// Missing fields in the stored file are filled with defaults, so the
/// response is always a complete configuration object.
#[utoipa::path(
    get,
    path = "/config",
    responses(
        (status = 200, description = "Current configuration", body = AppConfig),
    ),
    tag = "Config"
)]
pub async fn handle_get_config(State(state): State<AppState>) -> Json<AppConfig> {
    Json(state.config_store.load())
}

/// Persist a new configuration
#[utoipa::path(
    post,
    path = "/config",
    request_body = AppConfig,
    responses(
        (status = 200, description = "Configuration saved"),
        (status = 500, description = "Configuration could not be written"),
    ),
    tag = "Config"
)]
pub async fn handle_set_config(
    State(state): State<AppState>,
    Json(config): Json<AppConfig>,
) -> Result<Json<serde_json::Value>, ApiError> {
    tracing::info!(path = %state.config_store.path().display(), "Saving configuration");
    state
        .config_store
        .save(&config)
        .map_err(|e| ApiError::Config(e.to_string()))?;
    Ok(Json(json!({ "success": true })))
}
