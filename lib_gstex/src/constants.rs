//! Fixed geometry and lookup tables of the GS local memory layout.

/// A 4bpp page is 128x128 pixels.
pub const PSMT4_PAGE_WIDTH: usize = 128;
pub const PSMT4_PAGE_HEIGHT: usize = 128;
/// Bytes per row of a 4bpp page (two pixels per byte).
pub const PSMT4_PAGE_ROW_BYTES: usize = PSMT4_PAGE_WIDTH / 2;
/// A 4bpp block is 32x16 pixels.
pub const PSMT4_BLOCK_HEIGHT: usize = 16;
pub const PSMT4_BLOCK_ROW_BYTES: usize = 16;

/// The same page seen as 32-bit words: 64x32 pixels.
pub const PSMCT32_PAGE_WIDTH: usize = 64;
pub const PSMCT32_PAGE_HEIGHT: usize = 32;
pub const PSMCT32_PAGE_ROW_BYTES: usize = PSMCT32_PAGE_WIDTH * 4;
/// A 32-bit block is 8x8 pixels.
pub const PSMCT32_BLOCK_HEIGHT: usize = 8;
pub const PSMCT32_BLOCK_ROW_BYTES: usize = 32;

pub const PAGE_BYTES: usize = PSMCT32_PAGE_ROW_BYTES * PSMCT32_PAGE_HEIGHT;
pub const BLOCK_BYTES: usize = 256;
pub const BLOCKS_PER_PAGE: usize = 32;

/// Block columns/rows of a page in the 4bpp view.
pub const PSMT4_PAGE_BLOCK_COLUMNS: usize = PSMT4_PAGE_WIDTH / 32;
pub const PSMT4_PAGE_BLOCK_ROWS: usize = PSMT4_PAGE_HEIGHT / PSMT4_BLOCK_HEIGHT;

/// Block columns/rows of a page in the 32-bit view.
pub const PSMCT32_PAGE_BLOCK_COLUMNS: usize = 8;
pub const PSMCT32_PAGE_BLOCK_ROWS: usize = 4;

/// Physical block number of each linear block slot of a 4bpp page.
pub const PAGE_BLOCK_ORDER4: [u8; BLOCKS_PER_PAGE] = [
    0, 2, 8, 10, 1, 3, 9, 11, 4, 6, 12, 14, 5, 7, 13, 15, //
    16, 18, 24, 26, 17, 19, 25, 27, 20, 22, 28, 30, 21, 23, 29, 31,
];

/// Physical block number of each linear block slot of a 32-bit page.
pub const PAGE_BLOCK_ORDER32: [u8; BLOCKS_PER_PAGE] = [
    0, 1, 4, 5, 16, 17, 20, 21, 2, 3, 6, 7, 18, 19, 22, 23, //
    8, 9, 12, 13, 24, 25, 28, 29, 10, 11, 14, 15, 26, 27, 30, 31,
];

/// Nibble positions read by each output nibble of a 4bpp block.
///
/// The first half drives passes 0 and 2 of a block, the second half passes 1
/// and 3. Each half is a permutation of `0..128`.
pub const NIBBLE_TABLE: [u8; 256] = [
    0, 8, 16, 24, 32, 40, 48, 56, 2, 10, 18, 26, 34, 42, 50, 58, //
    4, 12, 20, 28, 36, 44, 52, 60, 6, 14, 22, 30, 38, 46, 54, 62, //
    64, 72, 80, 88, 96, 104, 112, 120, 66, 74, 82, 90, 98, 106, 114, 122, //
    68, 76, 84, 92, 100, 108, 116, 124, 70, 78, 86, 94, 102, 110, 118, 126, //
    33, 41, 49, 57, 1, 9, 17, 25, 35, 43, 51, 59, 3, 11, 19, 27, //
    37, 45, 53, 61, 5, 13, 21, 29, 39, 47, 55, 63, 7, 15, 23, 31, //
    97, 105, 113, 121, 65, 73, 81, 89, 99, 107, 115, 123, 67, 75, 83, 91, //
    101, 109, 117, 125, 69, 77, 85, 93, 103, 111, 119, 127, 71, 79, 87, 95, //
    32, 40, 48, 56, 0, 8, 16, 24, 34, 42, 50, 58, 2, 10, 18, 26, //
    36, 44, 52, 60, 4, 12, 20, 28, 38, 46, 54, 62, 6, 14, 22, 30, //
    96, 104, 112, 120, 64, 72, 80, 88, 98, 106, 114, 122, 66, 74, 82, 90, //
    100, 108, 116, 124, 68, 76, 84, 92, 102, 110, 118, 126, 70, 78, 86, 94, //
    1, 9, 17, 25, 33, 41, 49, 57, 3, 11, 19, 27, 35, 43, 51, 59, //
    5, 13, 21, 29, 37, 45, 53, 61, 7, 15, 23, 31, 39, 47, 55, 63, //
    65, 73, 81, 89, 97, 105, 113, 121, 67, 75, 83, 91, 99, 107, 115, 123, //
    69, 77, 85, 93, 101, 109, 117, 125, 71, 79, 87, 95, 103, 111, 119, 127,
];

/// `(column, row)` of every physical block inside a 32-bit page, indexed by
/// block number.
pub const PAGE_BLOCK_POSITION32: [(u8, u8); BLOCKS_PER_PAGE] = block_positions32();

const fn block_positions32() -> [(u8, u8); BLOCKS_PER_PAGE] {
    let mut positions = [(0u8, 0u8); BLOCKS_PER_PAGE];
    let mut slot = 0;
    while slot < BLOCKS_PER_PAGE {
        let block = PAGE_BLOCK_ORDER32[slot] as usize;
        positions[block] = (
            (slot % PSMCT32_PAGE_BLOCK_COLUMNS) as u8,
            (slot / PSMCT32_PAGE_BLOCK_COLUMNS) as u8,
        );
        slot += 1;
    }
    positions
}

/// Width of the synthetic strip every tiled texture is swizzled through.
pub const STRIP_WIDTH: u32 = 128;

/// Macro-block size of the wide-texture reorder pass.
pub const MACRO_WIDTH: usize = 256;
pub const MACRO_HEIGHT: usize = 128;
