//! Placement of texture tiles in the synthetic swizzle strip.
//!
//! Tiled textures are not swizzled at their own width. Their tiles are stacked
//! into a strip one tile wide, the strip is swizzled as a single tall texture,
//! and wide textures additionally have their 256x128 macro-blocks reordered.

use log::{debug, error};
use serde::{Deserialize, Serialize};

use super::{check_len, unsupported, SwizzleError};
use crate::constants::{MACRO_HEIGHT, MACRO_WIDTH, PAGE_BLOCK_ORDER4, STRIP_WIDTH};

/// Tile engine configuration of one texture variant and bit depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayout {
    pub tile_width: u32,
    pub tile_height: u32,
    /// Permute tile slots through the page block order.
    pub block_order: bool,
    /// Width from which the macro-block pass applies.
    pub macro_threshold: Option<u32>,
}

impl TileLayout {
    pub const STANDARD4: TileLayout = TileLayout {
        tile_width: STRIP_WIDTH,
        tile_height: 64,
        block_order: true,
        macro_threshold: Some(512),
    };

    pub const STANDARD8: TileLayout = TileLayout {
        tile_width: STRIP_WIDTH,
        tile_height: 64,
        block_order: false,
        macro_threshold: None,
    };

    pub const FONT4: TileLayout = TileLayout {
        tile_width: STRIP_WIDTH,
        tile_height: 128,
        block_order: false,
        macro_threshold: None,
    };

    /// Dimensions of the strip a `width`x`height` texture is swizzled as.
    ///
    /// Textures narrower than one tile are swizzled at their own size.
    pub fn strip_dimensions(
        &self,
        width: usize,
        height: usize,
    ) -> Result<(usize, usize), SwizzleError> {
        let (tile_width, tile_height) = (self.tile_width as usize, self.tile_height as usize);
        if tile_width == 0 || tile_height == 0 {
            return Err(unsupported(tile_width, tile_height, "empty tile"));
        }
        if width < tile_width {
            return Ok((width, height));
        }
        if width % tile_width != 0 || height % tile_height != 0 {
            error!(
                "{}x{} is not a whole number of {}x{} tiles",
                width, height, tile_width, tile_height
            );
            return Err(unsupported(width, height, "texture must be a whole number of tiles"));
        }
        Ok((tile_width, width * height / tile_width))
    }

    fn uses_macro_pass(&self, width: usize) -> bool {
        self.macro_threshold
            .is_some_and(|threshold| width >= threshold as usize)
    }

    /// Rebuilds a texture from its unswizzled strip.
    pub fn strip_to_raster(
        &self,
        strip: &[u8],
        width: usize,
        height: usize,
    ) -> Result<Vec<u8>, SwizzleError> {
        self.place_tiles(strip, width, height, Placement::Gather)
    }

    /// Lays a texture out as the strip that gets swizzled.
    pub fn raster_to_strip(
        &self,
        raster: &[u8],
        width: usize,
        height: usize,
    ) -> Result<Vec<u8>, SwizzleError> {
        self.place_tiles(raster, width, height, Placement::Scatter)
    }

    fn place_tiles(
        &self,
        data: &[u8],
        width: usize,
        height: usize,
        placement: Placement,
    ) -> Result<Vec<u8>, SwizzleError> {
        let (strip_width, strip_height) = self.strip_dimensions(width, height)?;
        check_len(data, width * height)?;
        if width < self.tile_width as usize {
            debug!("{}x{} is swizzled without a strip", width, height);
            return Ok(data.to_vec());
        }

        let (tile_width, tile_height) = (self.tile_width as usize, self.tile_height as usize);
        let columns = width / tile_width;
        let count = columns * (height / tile_height);
        let order = strip_order(count, self.block_order);
        debug!(
            "{} tiles of {}x{} through a {}x{} strip",
            count, tile_width, tile_height, strip_width, strip_height
        );

        let reorder_macros = self.uses_macro_pass(width);
        let source = match placement {
            Placement::Scatter if reorder_macros => macro_interleave(data, width, height),
            _ => data.to_vec(),
        };

        let mut output = vec![0u8; data.len()];
        for (tile, &slot) in order.iter().enumerate() {
            let in_raster = Rect {
                x: (tile % columns) * tile_width,
                y: (tile / columns) * tile_height,
                width: tile_width,
                height: tile_height,
            };
            let in_strip = Rect {
                x: 0,
                y: slot * tile_height,
                ..in_raster
            };
            match placement {
                Placement::Gather => {
                    copy_rect(&source, strip_width, in_strip, &mut output, width, in_raster)
                }
                Placement::Scatter => {
                    copy_rect(&source, width, in_raster, &mut output, strip_width, in_strip)
                }
            }
        }

        if matches!(placement, Placement::Gather) && reorder_macros {
            output = macro_deinterleave(&output, width, height);
        }
        Ok(output)
    }
}

#[derive(Debug, Clone, Copy)]
enum Placement {
    /// strip -> raster
    Gather,
    /// raster -> strip
    Scatter,
}

#[derive(Debug, Clone, Copy)]
struct Rect {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

/// Copies `from` out of `src` into the same-sized `to` of `dst`.
fn copy_rect(
    src: &[u8],
    src_stride: usize,
    from: Rect,
    dst: &mut [u8],
    dst_stride: usize,
    to: Rect,
) {
    for row in 0..from.height {
        let s = (from.y + row) * src_stride + from.x;
        let d = (to.y + row) * dst_stride + to.x;
        dst[d..d + from.width].copy_from_slice(&src[s..s + from.width]);
    }
}

/// Strip slot of every tile, tiles numbered row-major over the texture.
///
/// Complete groups of 32 tiles follow [`PAGE_BLOCK_ORDER4`]. A shorter final
/// group keeps the table entries that fall inside it, in table order.
pub fn strip_order(count: usize, block_order: bool) -> Vec<usize> {
    if !block_order {
        return (0..count).collect();
    }
    let mut order = Vec::with_capacity(count);
    for base in (0..count).step_by(PAGE_BLOCK_ORDER4.len()) {
        let group = (count - base).min(PAGE_BLOCK_ORDER4.len());
        order.extend(
            PAGE_BLOCK_ORDER4
                .iter()
                .map(|&slot| slot as usize)
                .filter(|&slot| slot < group)
                .map(|slot| base + slot),
        );
    }
    order
}

/// Macro-block that holds logical macro-block `(row, column)` in the stored
/// layout. Row pairs are interleaved into two columns.
fn macro_slot(row: usize, column: usize, rows: usize, columns: usize) -> (usize, usize) {
    let paired = row - row % 2 + 1 < rows;
    let slot = if paired {
        ((row / 2) * columns + column) * 2 + row % 2
    } else {
        row * columns + column
    };
    (slot / columns, slot % columns)
}

fn macro_pass(data: &[u8], width: usize, height: usize, to_stored: bool) -> Vec<u8> {
    let (columns, rows) = (width / MACRO_WIDTH, height / MACRO_HEIGHT);
    let mut output = data.to_vec();
    for row in 0..rows {
        for column in 0..columns {
            let (stored_row, stored_column) = macro_slot(row, column, rows, columns);
            let logical = Rect {
                x: column * MACRO_WIDTH,
                y: row * MACRO_HEIGHT,
                width: MACRO_WIDTH,
                height: MACRO_HEIGHT,
            };
            let stored = Rect {
                x: stored_column * MACRO_WIDTH,
                y: stored_row * MACRO_HEIGHT,
                ..logical
            };
            if to_stored {
                copy_rect(data, width, logical, &mut output, width, stored);
            } else {
                copy_rect(data, width, stored, &mut output, width, logical);
            }
        }
    }
    output
}

/// Moves logical macro-blocks of a wide texture to their stored positions.
/// Pixels outside the 256x128 grid are left in place.
pub fn macro_interleave(data: &[u8], width: usize, height: usize) -> Vec<u8> {
    macro_pass(data, width, height, true)
}

/// Exact inverse of [`macro_interleave`].
pub fn macro_deinterleave(data: &[u8], width: usize, height: usize) -> Vec<u8> {
    macro_pass(data, width, height, false)
}
