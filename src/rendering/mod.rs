//! Raster post-processing: decode, resample, sharpen, watermark, encode.

pub mod codec;
pub mod resample;
pub mod watermark;
