//! Persisted server configuration.
//!
//! The on-disk format is a single `config.json` with camelCase keys. Every
//! field carries a serde default so partially written or older files merge
//! cleanly with the defaults instead of failing to parse.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// What the server captures when a render request supplies no source of
/// its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Built-in synthetic test pattern.
    #[default]
    Demo,
    /// Navigate to the configured `url`.
    Url,
}

/// Output encoding for `/render`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain BMP of the resized raster.
    #[default]
    Bmp,
    /// Plain PNG of the resized raster.
    Png,
    /// Packed dual-plane black/white/red binary.
    Bwr,
}

impl OutputFormat {
    /// MIME type for HTTP responses.
    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Bmp => "image/bmp",
            OutputFormat::Png => "image/png",
            OutputFormat::Bwr => "application/octet-stream",
        }
    }

    /// File extension for the offline converter.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Bmp => "bmp",
            OutputFormat::Png => "png",
            OutputFormat::Bwr => "bwr",
        }
    }
}

/// Resampling kernel used when scaling the screenshot to panel size.
///
/// The names mirror the original configuration surface. `Lanczos2` is
/// accepted but resampled with the Lanczos-3 filter (see
/// `rendering::resample`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResampleKernel {
    Nearest,
    Cubic,
    Mitchell,
    Lanczos2,
    #[default]
    Lanczos3,
}

impl ResampleKernel {
    /// Parse a kernel name; unknown names fall back to Lanczos-3, the
    /// same fallback the configuration UI applies.
    pub fn parse_or_default(name: &str) -> Self {
        match name {
            "nearest" => ResampleKernel::Nearest,
            "cubic" => ResampleKernel::Cubic,
            "mitchell" => ResampleKernel::Mitchell,
            "lanczos2" => ResampleKernel::Lanczos2,
            "lanczos3" => ResampleKernel::Lanczos3,
            other => {
                tracing::warn!(kernel = other, "Unknown resize kernel, using lanczos3");
                ResampleKernel::Lanczos3
            }
        }
    }
}

/// Browser viewport for the capture.
///
/// `layout_width` lets a page lay out wider than the output width; the
/// effective view width is `max(width, layout_width)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub layout_width: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800,
            height: 480,
            layout_width: 800,
        }
    }
}

impl Viewport {
    /// The width the browser window actually gets.
    pub fn view_width(&self) -> u32 {
        self.layout_width.max(self.width)
    }
}

/// Screenshot crop rectangle, in capture pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Crop {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for Crop {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 800,
            height: 480,
        }
    }
}

/// The persisted server configuration (`config.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub mode: SourceMode,
    pub url: Option<String>,
    pub remove_classes: Vec<String>,
    pub mobile_mode: bool,
    pub dismiss_cookies: bool,
    pub timestamp_watermark: bool,
    pub format: OutputFormat,
    pub resize_algorithm: ResampleKernel,
    pub sharpen: f32,
    pub bwr_dither: bool,
    pub viewport: Viewport,
    pub crop: Crop,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: SourceMode::Demo,
            url: None,
            remove_classes: Vec::new(),
            mobile_mode: false,
            dismiss_cookies: false,
            timestamp_watermark: false,
            format: OutputFormat::Bmp,
            resize_algorithm: ResampleKernel::Lanczos3,
            sharpen: 0.0,
            bwr_dither: false,
            viewport: Viewport::default(),
            crop: Crop::default(),
        }
    }
}
