//! Conversion pipeline: screenshot bytes in, panel-ready bytes out.

use bwr_pack::{BwrEncoder, RasterImage};
use thiserror::Error;

use crate::models::{DisplaySpec, OutputFormat, ResampleKernel};
use crate::rendering::{codec, resample, watermark::Watermark};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("screenshot decode failed: {0}")]
    Decode(String),

    #[error("resize failed: {0}")]
    Resize(String),

    #[error("output encode failed: {0}")]
    Encode(String),

    #[error("plane packing failed: {0}")]
    Pack(#[from] bwr_pack::EncodeError),
}

/// Per-request conversion knobs, resolved from query parameters and the
/// persisted configuration by the HTTP layer.
#[derive(Debug, Clone, Copy)]
pub struct RenderParams {
    pub format: OutputFormat,
    pub kernel: ResampleKernel,
    pub sharpen: f32,
    pub bwr_dither: bool,
    pub timestamp_watermark: bool,
}

impl RenderParams {
    /// Parameters matching the configuration defaults.
    pub fn defaults() -> Self {
        Self {
            format: OutputFormat::Bmp,
            kernel: ResampleKernel::Lanczos3,
            sharpen: 0.0,
            bwr_dither: false,
            timestamp_watermark: false,
        }
    }
}

/// Owns the decode -> resample -> sharpen -> watermark -> encode chain.
///
/// Purely CPU-bound; callers on the async runtime wrap
/// [`convert`](ConvertPipeline::convert) in `spawn_blocking`.
pub struct ConvertPipeline {
    watermark: Watermark,
}

impl ConvertPipeline {
    pub fn new(watermark: Watermark) -> Self {
        Self { watermark }
    }

    /// Convert captured image bytes to the requested output format at
    /// panel geometry.
    pub fn convert(
        &self,
        captured: &[u8],
        spec: DisplaySpec,
        params: &RenderParams,
    ) -> Result<Vec<u8>, PipelineError> {
        let decoded = codec::decode_rgba(captured)?;

        tracing::debug!(
            from_width = decoded.width(),
            from_height = decoded.height(),
            to_width = spec.width,
            to_height = spec.height,
            kernel = ?params.kernel,
            "Resampling capture to panel size"
        );

        let resized = resample::resample(decoded, spec.width, spec.height, params.kernel)?;
        let mut raster = resample::sharpen(resized, params.sharpen);

        if params.timestamp_watermark {
            self.watermark.stamp(&mut raster, None);
        }

        match params.format {
            OutputFormat::Bmp => codec::encode_bmp(&raster),
            OutputFormat::Png => codec::encode_png(&raster),
            OutputFormat::Bwr => {
                let image = RasterImage::new(raster.as_raw(), raster.width(), raster.height())?;
                let packed = BwrEncoder::new()
                    .dithering(params.bwr_dither)
                    .encode(&image)?;
                debug_assert_eq!(packed.len(), spec.packed_len());
                Ok(packed)
            }
        }
    }

    /// The watermark stamper, shared with the preview path.
    pub fn watermark(&self) -> &Watermark {
        &self.watermark
    }
}
