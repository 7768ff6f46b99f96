pub mod block4;
pub mod nibble;
pub mod palette;
pub mod pixel8;
pub mod rows;
pub mod tiles;

use thiserror::Error;

pub use block4::{swizzle4, unswizzle4};
pub use palette::reorder_palette;
pub use pixel8::{swizzle8, unswizzle8};
pub use tiles::TileLayout;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SwizzleError {
    #[error("unsupported swizzle geometry {width}x{height}: {reason}")]
    UnsupportedDimensions {
        width: usize,
        height: usize,
        reason: &'static str,
    },
    #[error("buffer length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Which side of a permutation is the linear layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Linear -> hardware memory order.
    Swizzle,
    /// Hardware memory order -> linear.
    Unswizzle,
}

pub(crate) fn check_len(data: &[u8], expected: usize) -> Result<(), SwizzleError> {
    if data.len() != expected {
        return Err(SwizzleError::LengthMismatch {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

pub(crate) fn unsupported(width: usize, height: usize, reason: &'static str) -> SwizzleError {
    SwizzleError::UnsupportedDimensions {
        width,
        height,
        reason,
    }
}
