//! Conversion entry point: raster in, packed plane pair out.

use crate::diffuse::{clamp_channel, WorkingBuffer};
use crate::error::EncodeError;
use crate::palette::classify;
use crate::plane::PlanePair;

/// A borrowed RGBA raster, validated against its declared dimensions.
///
/// The raster must already be at the target output size — resampling is
/// an upstream concern. Samples are 8-bit RGBA, row-major, top-to-bottom.
#[derive(Debug, Clone, Copy)]
pub struct RasterImage<'a> {
    rgba: &'a [u8],
    width: u32,
    height: u32,
}

impl<'a> RasterImage<'a> {
    /// Wrap an RGBA buffer, checking that it matches `width * height * 4`
    /// bytes and that neither dimension is zero.
    pub fn new(rgba: &'a [u8], width: u32, height: u32) -> Result<Self, EncodeError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or(EncodeError::Allocation { bytes: usize::MAX })?;

        if width == 0 || height == 0 || rgba.len() != expected {
            return Err(EncodeError::InvalidInput {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }

        Ok(Self {
            rgba,
            width,
            height,
        })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The raw RGBA samples.
    #[inline]
    pub fn rgba(&self) -> &'a [u8] {
        self.rgba
    }
}

/// Converter from RGBA rasters to the packed dual-plane format.
///
/// Stateless between calls: every [`encode`](BwrEncoder::encode) allocates
/// its own working buffers and releases them on return, so concurrent
/// conversions of different images need no locking.
///
/// # Example
///
/// ```
/// use bwr_pack::{BwrEncoder, RasterImage};
///
/// let rgba = vec![0u8, 0, 0, 255].repeat(8); // 8x1 all-black
/// let image = RasterImage::new(&rgba, 8, 1).unwrap();
///
/// let packed = BwrEncoder::new().dithering(true).encode(&image).unwrap();
/// assert_eq!(packed, vec![0x00, 0xFF]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BwrEncoder {
    dithering: bool,
}

impl BwrEncoder {
    /// Create an encoder with dithering disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable Floyd-Steinberg error diffusion.
    ///
    /// Off, each pixel is classified purely from its own color. On,
    /// quantization error propagates to unvisited neighbors in row-major
    /// scan order.
    pub fn dithering(mut self, enabled: bool) -> Self {
        self.dithering = enabled;
        self
    }

    /// Convert a raster to `[black plane || red plane]` bytes.
    ///
    /// Output length is always `2 * ceil(width / 8) * height`. Returns an
    /// error — and no bytes — on invalid input or allocation failure.
    pub fn encode(&self, image: &RasterImage<'_>) -> Result<Vec<u8>, EncodeError> {
        let width = image.width() as usize;
        let height = image.height() as usize;

        let mut working = WorkingBuffer::from_rgba(image.rgba(), width, height)?;
        let mut planes = PlanePair::new(width, height)?;

        // Row-major, both axes ascending. The order is load-bearing when
        // dithering: later pixels read error deposited by earlier ones.
        for y in 0..height {
            for x in 0..width {
                let raw = working.get(x, y);
                let clamped = [
                    clamp_channel(raw[0]),
                    clamp_channel(raw[1]),
                    clamp_channel(raw[2]),
                ];
                let chosen = classify(clamped);

                if self.dithering {
                    let target = chosen.rgb();
                    let err = [
                        raw[0] - target[0],
                        raw[1] - target[1],
                        raw[2] - target[2],
                    ];
                    working.distribute_error(x, y, err);
                }

                planes.mark(x, y, chosen);
            }
        }

        planes.into_bytes()
    }
}
