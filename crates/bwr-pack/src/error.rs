//! Error type for the packing pipeline.
//!
//! Conversions are all-or-nothing: any failure aborts the call before a
//! single output byte is produced, so a caller never sees a partially
//! packed plane.

use std::fmt;

/// Reasons a conversion can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The raster buffer does not describe a `width` x `height` RGBA
    /// image: length mismatch, or a zero dimension.
    InvalidInput {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    /// A working or plane buffer could not be allocated (extreme
    /// dimensions, or plane size arithmetic overflowed).
    Allocation { bytes: usize },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::InvalidInput {
                width,
                height,
                expected,
                actual,
            } => write!(
                f,
                "invalid raster: {width}x{height} needs {expected} bytes, got {actual}"
            ),
            EncodeError::Allocation { bytes } => {
                write!(f, "failed to allocate {bytes} bytes for conversion buffers")
            }
        }
    }
}

impl std::error::Error for EncodeError {}
