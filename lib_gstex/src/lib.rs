pub mod constants;
pub mod image;
pub mod swizzle;

use log::{LevelFilter, SetLoggerError};
use std::io::Write;

pub use crate::image::error::TextureError;
pub use crate::image::format::{
    AlphaConvention, BitDepth, Color, Palette, Raster, Texture, Transparency,
};
pub use crate::image::header::{probe, Header};
pub use crate::image::profile::{
    ContainerProfile, DepthLayout, PaletteOrder, PixelOrder, RegionLayout,
};
pub use crate::image::{decode, decode_with, encode, encode_with, splice};
pub use crate::swizzle::{SwizzleError, TileLayout};

/// Routes this crate's log records to stderr at `level`.
///
/// Safe to call more than once; only the first logger installed wins.
pub fn init_logging(level: LevelFilter) -> Result<(), SetLoggerError> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stderr)
        .filter(Some("lib_gstex"), level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}:{}] {}",
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .try_init()
}
