//! Image decode/encode plumbing.
//!
//! Screenshot decoding and the BMP/PNG output encodings are delegated to
//! generic codecs; only the packed BWR format (crates/bwr-pack) is owned
//! by this project.

use image::RgbaImage;
use std::io::Cursor;

use crate::services::pipeline::PipelineError;

/// Decode an image (PNG screenshot, or any format the offline converter
/// is handed) into RGBA.
pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage, PipelineError> {
    let dynamic =
        image::load_from_memory(bytes).map_err(|e| PipelineError::Decode(e.to_string()))?;
    Ok(dynamic.to_rgba8())
}

/// Encode as BMP (RGB, no alpha — the panel firmware's BMP reader has no
/// use for an alpha channel).
pub fn encode_bmp(image: &RgbaImage) -> Result<Vec<u8>, PipelineError> {
    let rgb = image::DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut buf = Cursor::new(Vec::new());
    rgb.write_to(&mut buf, image::ImageFormat::Bmp)
        .map_err(|e| PipelineError::Encode(e.to_string()))?;
    Ok(buf.into_inner())
}

/// Encode as RGB8 PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, PipelineError> {
    let (width, height) = image.dimensions();
    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for px in image.pixels() {
        rgb.extend_from_slice(&px.0[..3]);
    }

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| PipelineError::Encode(e.to_string()))?;
        writer
            .write_image_data(&rgb)
            .map_err(|e| PipelineError::Encode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}
