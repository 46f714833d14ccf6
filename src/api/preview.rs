//! The preview endpoint: capture without panel conversion.
//!
//! Returns the raw screenshot as PNG so a configuration UI can show what
//! the panel will receive before committing. No resize happens here — the
//! UI overlays the crop rectangle itself.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::time::Duration;
use utoipa::IntoParams;

use crate::error::ApiError;
use crate::models::Viewport;
use crate::server::AppState;
use crate::services::capture::{CaptureRequest, CaptureSource};

/// Delay before the preview screenshot; shorter than the render delay to
/// keep the configuration UI responsive.
const PREVIEW_SETTLE: Duration = Duration::from_secs(2);

/// Query parameters for `/preview`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct PreviewQuery {
    /// Page to capture.
    pub url: Option<String>,
    /// `demo` previews the built-in test pattern.
    pub mode: Option<String>,
    /// Capture viewport width.
    pub width: Option<u32>,
    /// Capture viewport height.
    pub height: Option<u32>,
    /// Page layout width when wider than the viewport.
    pub layout_width: Option<u32>,
    /// Attempt to dismiss cookie banners.
    pub dismiss_cookies: Option<bool>,
    /// Stamp a timestamp onto the preview.
    pub timestamp_watermark: Option<bool>,
    /// Comma-separated class names to remove before the screenshot.
    pub remove_classes: Option<String>,
    /// Use the mobile user agent.
    pub mobile_mode: Option<bool>,
    /// Crop rectangle, used to position the watermark only.
    pub crop_x: Option<u32>,
    pub crop_y: Option<u32>,
    pub crop_w: Option<u32>,
    pub crop_h: Option<u32>,
}

impl PreviewQuery {
    fn crop_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        match (self.crop_x, self.crop_y, self.crop_w, self.crop_h) {
            (Some(x), Some(y), Some(w), Some(h)) => Some((x, y, w, h)),
            _ => None,
        }
    }
}

/// Preview a capture as PNG
#[utoipa::path(
    get,
    path = "/preview",
    params(PreviewQuery),
    responses(
        (status = 200, description = "Screenshot PNG", content_type = "image/png"),
        (status = 400, description = "Missing url parameter"),
        (status = 500, description = "Capture failed"),
    ),
    tag = "Render"
)]
pub async fn handle_preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Result<Response, ApiError> {
    let source = if query.mode.as_deref() == Some("demo") {
        CaptureSource::Demo
    } else if let Some(url) = &query.url {
        CaptureSource::Url(url.clone())
    } else {
        return Err(ApiError::MissingSource);
    };

    let width = query.width.unwrap_or(800);
    let height = query.height.unwrap_or(600);
    let remove_classes: Vec<String> = query
        .remove_classes
        .as_deref()
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let captured = state
        .capture
        .capture(CaptureRequest {
            source,
            viewport: Viewport {
                width,
                height,
                layout_width: query.layout_width.unwrap_or(width),
            },
            mobile: query.mobile_mode.unwrap_or(false),
            dismiss_cookies: query.dismiss_cookies.unwrap_or(false),
            remove_classes,
            crop: None,
            settle: PREVIEW_SETTLE,
        })
        .await?;

    // Without a watermark the browser's PNG goes straight through.
    if !query.timestamp_watermark.unwrap_or(false) {
        return Ok(png_response(captured));
    }

    let bounds = query.crop_bounds();
    let pipeline = state.pipeline.clone();
    let stamped = tokio::task::spawn_blocking(move || {
        let mut image = crate::rendering::codec::decode_rgba(&captured)?;
        pipeline.watermark().stamp(&mut image, bounds);
        crate::rendering::codec::encode_png(&image)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("watermark task failed: {e}")))??;

    Ok(png_response(stamped))
}

fn png_response(bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "image/png")], bytes).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_bounds_requires_all_four() {
        let mut query = PreviewQuery {
            crop_x: Some(0),
            crop_y: Some(0),
            crop_w: Some(800),
            ..PreviewQuery::default()
        };
        assert_eq!(query.crop_bounds(), None);
        query.crop_h = Some(480);
        assert_eq!(query.crop_bounds(), Some((0, 0, 800, 480)));
    }
}
