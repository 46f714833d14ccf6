//! Timestamp watermark.
//!
//! Stamps `YYYY-MM-DD HH:MM:SS` on a solid white box in the bottom-left
//! corner of the image (or of a given crop area), so a glance at the panel
//! shows when the content was rendered. A watermark problem never fails
//! the render: the original image is returned unchanged with a warning.

use ab_glyph::{FontVec, PxScale};
use chrono::{Duration, Utc};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::path::Path;

/// Text height in pixels; fixed so the box geometry is stable.
const TEXT_HEIGHT: u32 = 14;
const PADDING_H: u32 = 4;
const PADDING_V: u32 = 2;

/// Timestamp watermark stamper.
///
/// Holds the loaded font; with no font available every stamp call is a
/// warned no-op.
pub struct Watermark {
    font: Option<FontVec>,
    utc_offset_hours: i64,
}

impl Watermark {
    /// Load the font from `path`; `None` (or an unreadable file) yields a
    /// stamper that skips watermarking.
    pub fn new(font_path: Option<&Path>, utc_offset_hours: i64) -> Self {
        let font = font_path.and_then(|path| match std::fs::read(path) {
            Ok(bytes) => match FontVec::try_from_vec(bytes) {
                Ok(font) => Some(font),
                Err(e) => {
                    tracing::warn!(path = %path.display(), %e, "Failed to parse watermark font");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), %e, "Failed to read watermark font");
                None
            }
        });

        Self {
            font,
            utc_offset_hours,
        }
    }

    /// Build from the `FONT_FILE` environment variable with the default
    /// UTC+3 offset.
    pub fn from_env() -> Self {
        let path = std::env::var("FONT_FILE").ok();
        Self::new(path.as_deref().map(Path::new), 3)
    }

    /// The current timestamp string at the configured offset.
    fn timestamp(&self) -> String {
        let local = Utc::now() + Duration::hours(self.utc_offset_hours);
        local.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Stamp the timestamp onto `image`, bottom-left of `bounds`
    /// (x, y, width, height) or of the whole image when `bounds` is None.
    pub fn stamp(&self, image: &mut RgbaImage, bounds: Option<(u32, u32, u32, u32)>) {
        let Some(font) = &self.font else {
            tracing::warn!("Timestamp watermark requested but no font is loaded, skipping");
            return;
        };

        let text = self.timestamp();
        let scale = PxScale::from(TEXT_HEIGHT as f32);
        let (text_width, _) = text_size(scale, font, &text);

        let box_width = text_width + PADDING_H * 2;
        let box_height = TEXT_HEIGHT + PADDING_V * 2;

        let (area_x, area_y, _area_w, area_h) =
            bounds.unwrap_or((0, 0, image.width(), image.height()));
        let box_x = area_x;
        let box_y = (area_y + area_h).saturating_sub(box_height);

        draw_filled_rect_mut(
            image,
            Rect::at(box_x as i32, box_y as i32).of_size(box_width, box_height),
            Rgba([255, 255, 255, 255]),
        );
        draw_text_mut(
            image,
            Rgba([0, 0, 0, 255]),
            (box_x + PADDING_H) as i32,
            (box_y + PADDING_V) as i32,
            scale,
            font,
            &text,
        );

        tracing::debug!(%text, "Timestamp watermark added");
    }

    /// Whether a font is loaded and stamping will actually draw.
    pub fn is_active(&self) -> bool {
        self.font.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_font_is_inactive() {
        let wm = Watermark::new(None, 3);
        assert!(!wm.is_active());

        let wm = Watermark::new(Some(Path::new("/nonexistent/font.ttf")), 3);
        assert!(!wm.is_active());
    }

    #[test]
    fn test_stamp_without_font_leaves_image_unchanged() {
        let wm = Watermark::new(None, 3);
        let mut image = RgbaImage::from_pixel(64, 32, Rgba([10, 10, 10, 255]));
        let before = image.clone();
        wm.stamp(&mut image, None);
        assert_eq!(image, before);
    }

    #[test]
    fn test_timestamp_format() {
        let wm = Watermark::new(None, 0);
        let text = wm.timestamp();
        // YYYY-MM-DD HH:MM:SS
        assert_eq!(text.len(), 19);
        assert_eq!(&text[4..5], "-");
        assert_eq!(&text[10..11], " ");
        assert_eq!(&text[13..14], ":");
    }

    #[test]
    fn test_offset_shifts_hour() {
        let base = Watermark::new(None, 0).timestamp();
        let ahead = Watermark::new(None, 12).timestamp();
        // Not byte-equal: 12 hours apart can never render identically.
        assert_ne!(base, ahead);
    }
}
