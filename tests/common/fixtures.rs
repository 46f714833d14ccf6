//! PNG fixtures for capture stubs.

use image::{Rgba, RgbaImage};
use std::io::Cursor;

/// Encode an RGBA image as PNG bytes.
pub fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, image::ImageFormat::Png)
        .expect("fixture PNG encode");
    buf.into_inner()
}

/// A solid-color PNG at the given size.
pub fn solid_png(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
    png_bytes(&RgbaImage::from_pixel(width, height, Rgba(px)))
}

/// A left-half-black, right-half-white PNG.
pub fn split_png(width: u32, height: u32) -> Vec<u8> {
    png_bytes(&RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([255, 255, 255, 255])
        }
    }))
}
