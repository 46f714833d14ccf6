//! Screenshot resampling to panel dimensions.
//!
//! The capture can come back at any size (layout width, crop rectangle);
//! the panel wants exactly its native geometry. Scaling runs through
//! fast_image_resize with the kernel selected in the configuration.

use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::RgbaImage;

use crate::models::ResampleKernel;
use crate::services::pipeline::PipelineError;

impl ResampleKernel {
    /// The fast_image_resize algorithm for this kernel name.
    ///
    /// Lanczos-2 has no equivalent filter and resolves to Lanczos-3; the
    /// name stays accepted because it is part of the persisted
    /// configuration surface.
    fn resize_alg(self) -> ResizeAlg {
        match self {
            ResampleKernel::Nearest => ResizeAlg::Nearest,
            ResampleKernel::Cubic => ResizeAlg::Convolution(FilterType::CatmullRom),
            ResampleKernel::Mitchell => ResizeAlg::Convolution(FilterType::Mitchell),
            ResampleKernel::Lanczos2 => {
                tracing::warn!("lanczos2 is not available, resampling with lanczos3");
                ResizeAlg::Convolution(FilterType::Lanczos3)
            }
            ResampleKernel::Lanczos3 => ResizeAlg::Convolution(FilterType::Lanczos3),
        }
    }
}

/// Scale `src` to exactly `width` x `height`.
///
/// A same-size input is passed through untouched so the common case — a
/// capture already at panel geometry — costs nothing.
pub fn resample(
    src: RgbaImage,
    width: u32,
    height: u32,
    kernel: ResampleKernel,
) -> Result<RgbaImage, PipelineError> {
    let (src_width, src_height) = src.dimensions();
    if src_width == width && src_height == height {
        return Ok(src);
    }

    let src_image = Image::from_vec_u8(src_width, src_height, src.into_raw(), PixelType::U8x4)
        .map_err(|e| PipelineError::Resize(e.to_string()))?;
    let mut dst_image = Image::new(width, height, PixelType::U8x4);

    let mut resizer = Resizer::new();
    resizer
        .resize(
            &src_image,
            &mut dst_image,
            Some(&ResizeOptions::new().resize_alg(kernel.resize_alg())),
        )
        .map_err(|e| PipelineError::Resize(e.to_string()))?;

    RgbaImage::from_raw(width, height, dst_image.buffer().to_vec())
        .ok_or_else(|| PipelineError::Resize("resampler returned short buffer".into()))
}

/// Unsharp-mask the raster; `amount` acts as the blur sigma, 0 disables.
/// Mild sharpening keeps small text legible after the panel downscale.
pub fn sharpen(src: RgbaImage, amount: f32) -> RgbaImage {
    if amount <= 0.0 {
        return src;
    }
    image::imageops::unsharpen(&src, amount, 0)
}
