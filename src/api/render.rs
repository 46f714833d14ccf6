//! The render endpoint: capture, convert, respond.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::time::Duration;
use utoipa::IntoParams;

use crate::error::ApiError;
use crate::models::{AppConfig, Crop, DisplaySpec, OutputFormat, ResampleKernel, Viewport};
use crate::server::AppState;
use crate::services::capture::{CaptureRequest, CaptureSource};
use crate::services::pipeline::RenderParams;

/// Delay before the render screenshot; pages get this long to finish
/// loading dynamic content.
const RENDER_SETTLE: Duration = Duration::from_secs(5);

/// Query parameters for `/render`. Every parameter overrides the
/// persisted configuration.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct RenderQuery {
    /// Page to capture; overrides the configured source.
    pub url: Option<String>,
    /// `demo` renders the built-in test pattern.
    pub mode: Option<String>,
    /// Capture viewport width.
    pub width: Option<u32>,
    /// Capture viewport height.
    pub height: Option<u32>,
    /// Page layout width when wider than the viewport.
    pub layout_width: Option<u32>,
    /// Attempt to dismiss cookie banners before the screenshot.
    pub dismiss_cookies: Option<bool>,
    /// Stamp a timestamp onto the output.
    pub timestamp_watermark: Option<bool>,
    /// Output format: `bmp`, `png` or `bwr`.
    pub format: Option<OutputFormat>,
    /// Resampling kernel name; unknown names fall back to lanczos3.
    pub resize_algorithm: Option<String>,
    /// Unsharp-mask amount after resize; 0 disables.
    pub sharpen: Option<f32>,
    /// Floyd-Steinberg dithering for `bwr` output.
    pub bwr_dither: Option<bool>,
}

/// Everything a render run needs, resolved from query + configuration.
#[derive(Debug)]
struct ResolvedRender {
    source: CaptureSource,
    viewport: Viewport,
    mobile: bool,
    dismiss_cookies: bool,
    remove_classes: Vec<String>,
    crop: Option<Crop>,
    params: RenderParams,
}

/// Resolve query parameters against the persisted configuration.
///
/// When the request carries no source of its own (no body, no `url`, no
/// `mode`), the configuration drives the whole render; explicit requests
/// ignore the configured source, crop and class list, matching the
/// behavior of the preview UI contract.
fn resolve(query: &RenderQuery, body: &str, config: &AppConfig) -> Result<ResolvedRender, ApiError> {
    let has_body = !body.trim().is_empty();
    let use_config = !has_body && query.url.is_none() && query.mode.is_none();

    let source = if query.mode.as_deref() == Some("demo") {
        CaptureSource::Demo
    } else if let Some(url) = &query.url {
        CaptureSource::Url(url.clone())
    } else if has_body {
        CaptureSource::Html(body.to_string())
    } else {
        match config.mode {
            crate::models::SourceMode::Demo => CaptureSource::Demo,
            crate::models::SourceMode::Url => match &config.url {
                Some(url) => CaptureSource::Url(url.clone()),
                None => return Err(ApiError::MissingSource),
            },
        }
    };

    let base_viewport = if use_config {
        config.viewport
    } else {
        Viewport::default()
    };
    let width = query.width.unwrap_or(base_viewport.width);
    let height = query.height.unwrap_or(base_viewport.height);
    let layout_width = query.layout_width.unwrap_or(if use_config {
        base_viewport.layout_width
    } else {
        width
    });

    let params = RenderParams {
        format: query
            .format
            .unwrap_or(if use_config { config.format } else { OutputFormat::Bmp }),
        kernel: match &query.resize_algorithm {
            Some(name) => ResampleKernel::parse_or_default(name),
            None if use_config => config.resize_algorithm,
            None => ResampleKernel::Lanczos3,
        },
        sharpen: query
            .sharpen
            .unwrap_or(if use_config { config.sharpen } else { 0.0 }),
        bwr_dither: query.bwr_dither.unwrap_or(use_config && config.bwr_dither),
        timestamp_watermark: query
            .timestamp_watermark
            .unwrap_or(use_config && config.timestamp_watermark),
    };

    Ok(ResolvedRender {
        source,
        viewport: Viewport {
            width,
            height,
            layout_width,
        },
        mobile: use_config && config.mobile_mode,
        dismiss_cookies: query
            .dismiss_cookies
            .unwrap_or(use_config && config.dismiss_cookies),
        remove_classes: if use_config {
            config.remove_classes.clone()
        } else {
            Vec::new()
        },
        crop: if use_config { Some(config.crop) } else { None },
        params,
    })
}

/// Render a page to panel-ready bytes
///
/// The source is the request body (HTML), `?url=`, or `?mode=demo`; with
/// none of those the persisted configuration supplies source and options.
/// Output dimensions are fixed at the panel's native geometry.
#[utoipa::path(
    post,
    path = "/render",
    params(RenderQuery),
    request_body(content = String, description = "Optional HTML document to render", content_type = "text/html"),
    responses(
        (status = 200, description = "Converted image bytes"),
        (status = 400, description = "No source given and none configured"),
        (status = 500, description = "Capture or conversion failed"),
    ),
    tag = "Render"
)]
pub async fn handle_render(
    State(state): State<AppState>,
    Query(query): Query<RenderQuery>,
    body: String,
) -> Result<Response, ApiError> {
    let config = state.config_store.load();
    let resolved = resolve(&query, &body, &config)?;

    tracing::info!(
        source = source_kind(&resolved.source),
        format = ?resolved.params.format,
        dither = resolved.params.bwr_dither,
        "Render requested"
    );

    let captured = state
        .capture
        .capture(CaptureRequest {
            source: resolved.source,
            viewport: resolved.viewport,
            mobile: resolved.mobile,
            dismiss_cookies: resolved.dismiss_cookies,
            remove_classes: resolved.remove_classes,
            crop: resolved.crop,
            settle: RENDER_SETTLE,
        })
        .await?;

    let pipeline = state.pipeline.clone();
    let params = resolved.params;
    let bytes = tokio::task::spawn_blocking(move || {
        pipeline.convert(&captured, DisplaySpec::BWR_750, &params)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("conversion task failed: {e}")))??;

    Ok((
        [(header::CONTENT_TYPE, params.format.content_type())],
        bytes,
    )
        .into_response())
}

fn source_kind(source: &CaptureSource) -> &'static str {
    match source {
        CaptureSource::Demo => "demo",
        CaptureSource::Url(_) => "url",
        CaptureSource::Html(_) => "html",
    }
}
