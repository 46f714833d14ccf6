//! bwr-pack: dual-plane 1-bit packing for black/white/red e-paper panels
//!
//! This library converts a full-color RGBA raster into the packed binary
//! format consumed by GxEPD2-style three-color display controllers: two
//! independent 1-bit-per-pixel planes (black activity, red activity),
//! concatenated back to back.
//!
//! # Quick Start
//!
//! The [`BwrEncoder`] builder is the entry point:
//!
//! ```
//! use bwr_pack::{BwrEncoder, RasterImage};
//!
//! let rgba = vec![255u8; 8 * 1 * 4]; // 8x1 all-white
//! let image = RasterImage::new(&rgba, 8, 1).unwrap();
//!
//! let packed = BwrEncoder::new().encode(&image).unwrap();
//! assert_eq!(packed, vec![0xFF, 0xFF]); // both planes inactive
//! ```
//!
//! # Output Layout
//!
//! With `stride = ceil(width / 8)`:
//!
//! ```text
//! offset 0 .. stride*height-1               black/white plane
//! offset stride*height .. 2*stride*height-1 red plane
//! ```
//!
//! Both planes are row-major with MSB-first bits. A bit value of 1 means
//! inactive (white / no red); 0 means active (black / red). There is no
//! header — dimensions travel out of band, fixed by the calling convention
//! (800x480 in the reference deployment).
//!
//! # Dithering
//!
//! Error diffusion is off by default. When enabled via
//! [`BwrEncoder::dithering`], quantization error propagates to unvisited
//! neighbors with Floyd-Steinberg weights, trading hard posterization for
//! average-tone accuracy. The scan order (row-major, both axes ascending)
//! is part of the contract: each pixel's effective input depends on error
//! deposited by earlier pixels, so the conversion is inherently sequential.
//!
//! # Palette
//!
//! The palette is fixed: black (0,0,0), white (255,255,255), red (255,0,0).
//! Classification uses squared Euclidean distance in RGB space with an
//! asymmetric tie-break preserved for hardware compatibility — see
//! [`palette::classify`].

pub mod diffuse;
pub mod encoder;
pub mod error;
pub mod palette;
pub mod plane;


pub use diffuse::{WorkingBuffer, FLOYD_STEINBERG};
pub use encoder::{BwrEncoder, RasterImage};
pub use error::EncodeError;
pub use palette::{classify, BwrColor};
pub use plane::PlanePair;
