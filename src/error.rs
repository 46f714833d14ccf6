use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::capture::CaptureError;
use crate::services::pipeline::PipelineError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing url parameter")]
    MissingSource,

    #[error("Invalid parameter: {0}")]
    BadParameter(String),

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Conversion error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingSource | ApiError::BadParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::Capture(_)
            | ApiError::Pipeline(_)
            | ApiError::Config(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
