//! Panel geometry.

/// Physical geometry of the target panel.
///
/// The packed output format carries no header, so the firmware and the
/// server must agree on dimensions out of band - this is that agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySpec {
    pub width: u32,
    pub height: u32,
}

impl DisplaySpec {
    /// 7.5" three-color GxEPD2 panel, the reference deployment target.
    pub const BWR_750: DisplaySpec = DisplaySpec {
        width: 800,
        height: 480,
    };

    /// Bytes per packed plane row.
    pub fn stride(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }

    /// Total packed output length: two planes of `stride * height` bytes.
    pub fn packed_len(&self) -> usize {
        2 * self.stride() * self.height as usize
    }
}
