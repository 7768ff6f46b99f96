use thiserror::Error;

use crate::swizzle::SwizzleError;

#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Truncated data: need {needed} bytes, got {actual}")]
    TruncatedData { needed: usize, actual: usize },
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Raster is {actual:?} but the template header is {expected:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("Palette has {actual} colors, the bit depth requires {expected}")]
    PaletteSizeMismatch { expected: usize, actual: usize },
    #[error("Output is {actual} bytes, expected exactly {expected}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("Texture dimensions {width}x{height} have no hardware layout")]
    UnsupportedDimensions { width: u32, height: u32 },
    #[error("Raster holds {actual} indices, {width}x{height} needs {expected}")]
    InvalidRaster {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("Palette index {index} at pixel #{pixel} does not fit {colors} colors")]
    IndexOutOfRange {
        pixel: usize,
        index: u8,
        colors: usize,
    },
    #[error("Swizzle failed")]
    Swizzle(#[from] SwizzleError),
    #[error("Invalid profile data")]
    InvalidProfile(#[from] bincode::Error),
}

impl TextureError {
    /// Reports swizzle geometry failures against the texture's own size.
    pub(crate) fn from_swizzle(
        width: u32,
        height: u32,
    ) -> impl FnOnce(SwizzleError) -> TextureError {
        move |err| match err {
            SwizzleError::UnsupportedDimensions { .. } => {
                TextureError::UnsupportedDimensions { width, height }
            }
            other => TextureError::Swizzle(other),
        }
    }
}
