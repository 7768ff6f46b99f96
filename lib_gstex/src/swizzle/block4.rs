//! 4bpp (PSMT4) swizzling.
//!
//! A PSMT4 page covers 128x128 pixels and occupies the same 8 KiB as a 64x32
//! PSMCT32 page. Each 32x16 block of 4bpp pixels lives inside one 8x8 block of
//! the 32-bit view, with its nibbles shuffled by [`NIBBLE_TABLE`]. Blocks are
//! located through [`PAGE_BLOCK_ORDER4`] and [`PAGE_BLOCK_ORDER32`].
//!
//! Pages that are narrower or shorter than 128x128 only use part of it; the
//! strides below shrink to the real page size in that case.

use log::{debug, error};

use super::{check_len, unsupported, Direction, SwizzleError};
use crate::constants::{
    BLOCK_BYTES, NIBBLE_TABLE, PAGE_BLOCK_ORDER4, PAGE_BLOCK_POSITION32, PAGE_BYTES,
    PSMCT32_BLOCK_HEIGHT, PSMCT32_BLOCK_ROW_BYTES, PSMCT32_PAGE_ROW_BYTES,
    PSMT4_BLOCK_HEIGHT, PSMT4_BLOCK_ROW_BYTES, PSMT4_PAGE_BLOCK_COLUMNS, PSMT4_PAGE_BLOCK_ROWS,
    PSMT4_PAGE_HEIGHT, PSMT4_PAGE_ROW_BYTES, PSMT4_PAGE_WIDTH,
};

/// Nibbles handled by one pass over a 64-byte quarter of a block.
const PASS_NIBBLES: usize = 128;
const BLOCK_NIBBLES: usize = BLOCK_BYTES * 2;

fn nibble(data: &[u8], index: usize) -> u8 {
    (data[index >> 1] >> ((index & 1) * 4)) & 0x0F
}

fn set_nibble(data: &mut [u8], index: usize, value: u8) {
    let shift = (index & 1) * 4;
    let byte = &mut data[index >> 1];
    *byte = (*byte & !(0x0F << shift)) | ((value & 0x0F) << shift);
}

/// Nibble of the 32-bit view that holds linear nibble `index` of a block.
fn source_nibble(index: usize) -> usize {
    let pass = index / PASS_NIBBLES;
    let entry = (pass % 2) * PASS_NIBBLES + index % PASS_NIBBLES;
    pass * PASS_NIBBLES + NIBBLE_TABLE[entry] as usize
}

/// Reorders one block from the 32-bit view (8 rows of 32 bytes) into linear
/// 4bpp order (16 rows of 16 bytes).
pub fn unswizzle_block(input: &[u8; BLOCK_BYTES]) -> [u8; BLOCK_BYTES] {
    let mut output = [0u8; BLOCK_BYTES];
    for index in 0..BLOCK_NIBBLES {
        set_nibble(&mut output, index, nibble(input, source_nibble(index)));
    }
    output
}

/// Exact inverse of [`unswizzle_block`].
pub fn swizzle_block(input: &[u8; BLOCK_BYTES]) -> [u8; BLOCK_BYTES] {
    let mut output = [0u8; BLOCK_BYTES];
    for index in 0..BLOCK_NIBBLES {
        set_nibble(&mut output, source_nibble(index), nibble(input, index));
    }
    output
}

/// Converts a whole page between the 32-bit view (256-byte rows) and the
/// linear 4bpp view (64-byte rows).
fn convert_page(input: &[u8], output: &mut [u8], direction: Direction) {
    for block_row in 0..PSMT4_PAGE_BLOCK_ROWS {
        for block_column in 0..PSMT4_PAGE_BLOCK_COLUMNS {
            let block = PAGE_BLOCK_ORDER4[block_row * PSMT4_PAGE_BLOCK_COLUMNS + block_column];
            let (column32, row32) = PAGE_BLOCK_POSITION32[block as usize];
            let origin32 = row32 as usize * PSMCT32_BLOCK_HEIGHT * PSMCT32_PAGE_ROW_BYTES
                + column32 as usize * PSMCT32_BLOCK_ROW_BYTES;
            let origin4 = block_row * PSMT4_BLOCK_HEIGHT * PSMT4_PAGE_ROW_BYTES
                + block_column * PSMT4_BLOCK_ROW_BYTES;

            let mut gathered = [0u8; BLOCK_BYTES];
            match direction {
                Direction::Unswizzle => {
                    for (k, row) in gathered.chunks_exact_mut(PSMCT32_BLOCK_ROW_BYTES).enumerate() {
                        let start = origin32 + k * PSMCT32_PAGE_ROW_BYTES;
                        row.copy_from_slice(&input[start..start + PSMCT32_BLOCK_ROW_BYTES]);
                    }
                    let linear = unswizzle_block(&gathered);
                    for (k, row) in linear.chunks_exact(PSMT4_BLOCK_ROW_BYTES).enumerate() {
                        let start = origin4 + k * PSMT4_PAGE_ROW_BYTES;
                        output[start..start + PSMT4_BLOCK_ROW_BYTES].copy_from_slice(row);
                    }
                }
                Direction::Swizzle => {
                    for (k, row) in gathered.chunks_exact_mut(PSMT4_BLOCK_ROW_BYTES).enumerate() {
                        let start = origin4 + k * PSMT4_PAGE_ROW_BYTES;
                        row.copy_from_slice(&input[start..start + PSMT4_BLOCK_ROW_BYTES]);
                    }
                    let swizzled = swizzle_block(&gathered);
                    for (k, row) in swizzled.chunks_exact(PSMCT32_BLOCK_ROW_BYTES).enumerate() {
                        let start = origin32 + k * PSMCT32_PAGE_ROW_BYTES;
                        output[start..start + PSMCT32_BLOCK_ROW_BYTES].copy_from_slice(row);
                    }
                }
            }
        }
    }
}

/// Strides of a texture laid out over one or more pages.
///
/// Every page uses the strides of its own size, so a texture shorter than a
/// page, or the last row of pages of a taller one, only fills the top-left
/// part of the 32-bit view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PageGeometry {
    height: usize,
    pages_wide: usize,
    pages_high: usize,
    /// 32-bit page rows that belong to this texture.
    swizzled_rows: usize,
    /// Bytes of each 4bpp page row that belong to this texture.
    linear_row_bytes: usize,
}

impl PageGeometry {
    fn new(width: usize, height: usize) -> Result<Self, SwizzleError> {
        if width == 0 || height == 0 {
            return Err(unsupported(width, height, "empty texture"));
        }
        if width % 32 != 0 || height % PSMT4_BLOCK_HEIGHT != 0 {
            return Err(unsupported(
                width,
                height,
                "4bpp textures must be multiples of 32x16 pixels",
            ));
        }
        if width > PSMT4_PAGE_WIDTH && width % PSMT4_PAGE_WIDTH != 0 {
            return Err(unsupported(
                width,
                height,
                "4bpp textures wider than a page must span whole pages",
            ));
        }

        let page_width = width.min(PSMT4_PAGE_WIDTH);
        Ok(Self {
            height,
            pages_wide: width.div_ceil(PSMT4_PAGE_WIDTH),
            pages_high: height.div_ceil(PSMT4_PAGE_HEIGHT),
            swizzled_rows: page_width / 4,
            linear_row_bytes: page_width / 2,
        })
    }

    /// Pixel rows of the pages in `page_row`.
    fn page_height(&self, page_row: usize) -> usize {
        (self.height - page_row * PSMT4_PAGE_HEIGHT).min(PSMT4_PAGE_HEIGHT)
    }

    /// Bytes of each 32-bit page row that belong to the pages in `page_row`.
    fn swizzled_row_bytes(&self, page_row: usize) -> usize {
        self.page_height(page_row) * 2
    }

    fn swizzled_origin(&self, page_row: usize, page_column: usize) -> usize {
        PSMCT32_PAGE_ROW_BYTES * self.swizzled_rows * self.pages_wide * page_row
            + self.swizzled_row_bytes(page_row) * page_column
    }

    fn linear_origin(&self, page_row: usize, page_column: usize) -> usize {
        self.linear_row_bytes * PSMT4_PAGE_HEIGHT * self.pages_wide * page_row
            + self.linear_row_bytes * page_column
    }
}

fn convert(
    data: &[u8],
    width: usize,
    height: usize,
    direction: Direction,
) -> Result<Vec<u8>, SwizzleError> {
    let geometry = PageGeometry::new(width, height).inspect_err(|e| error!("{}", e))?;
    check_len(data, width * height / 2)?;
    debug!("4bpp {:?} {}x{}: {:?}", direction, width, height, geometry);

    let mut output = vec![0u8; data.len()];
    let mut page_in = vec![0u8; PAGE_BYTES];
    let mut page_out = vec![0u8; PAGE_BYTES];

    for page_row in 0..geometry.pages_high {
        let swizzled_row_bytes = geometry.swizzled_row_bytes(page_row);
        let linear_rows = geometry.page_height(page_row);
        let linear_row_bytes = geometry.linear_row_bytes;
        let swizzled_stride = swizzled_row_bytes * geometry.pages_wide;
        let linear_stride = linear_row_bytes * geometry.pages_wide;

        for page_column in 0..geometry.pages_wide {
            let swizzled = geometry.swizzled_origin(page_row, page_column);
            let linear = geometry.linear_origin(page_row, page_column);

            page_in.fill(0);
            match direction {
                Direction::Unswizzle => {
                    for k in 0..geometry.swizzled_rows {
                        let src = swizzled + k * swizzled_stride;
                        let dst = k * PSMCT32_PAGE_ROW_BYTES;
                        page_in[dst..dst + swizzled_row_bytes]
                            .copy_from_slice(&data[src..src + swizzled_row_bytes]);
                    }
                    convert_page(&page_in, &mut page_out, direction);
                    for k in 0..linear_rows {
                        let src = k * PSMT4_PAGE_ROW_BYTES;
                        let dst = linear + k * linear_stride;
                        output[dst..dst + linear_row_bytes]
                            .copy_from_slice(&page_out[src..src + linear_row_bytes]);
                    }
                }
                Direction::Swizzle => {
                    for k in 0..linear_rows {
                        let src = linear + k * linear_stride;
                        let dst = k * PSMT4_PAGE_ROW_BYTES;
                        page_in[dst..dst + linear_row_bytes]
                            .copy_from_slice(&data[src..src + linear_row_bytes]);
                    }
                    convert_page(&page_in, &mut page_out, direction);
                    for k in 0..geometry.swizzled_rows {
                        let src = k * PSMCT32_PAGE_ROW_BYTES;
                        let dst = swizzled + k * swizzled_stride;
                        output[dst..dst + swizzled_row_bytes]
                            .copy_from_slice(&page_out[src..src + swizzled_row_bytes]);
                    }
                }
            }
        }
    }

    Ok(output)
}

/// Converts packed 4bpp pixels (low nibble first) from GS memory order to
/// linear order.
pub fn unswizzle4(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, SwizzleError> {
    convert(data, width, height, Direction::Unswizzle)
}

/// Converts packed linear 4bpp pixels to GS memory order.
pub fn swizzle4(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, SwizzleError> {
    convert(data, width, height, Direction::Swizzle)
}
