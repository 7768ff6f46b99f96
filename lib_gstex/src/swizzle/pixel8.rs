//! 8bpp (PSMT8) swizzling.
//!
//! Every pixel has a closed-form address in GS memory. The same formula drives
//! both directions; only the roles of the linear and swizzled offsets swap.

use log::{debug, error};

use super::{check_len, unsupported, Direction, SwizzleError};

/// Byte offset in GS memory order of the pixel at `(x, y)` in a texture
/// `width` pixels wide.
pub fn swizzled_offset(x: usize, y: usize, width: usize) -> usize {
    let block_location = (y & !0xF) * width + (x & !0xF) * 2;
    let swap_selector = (((y + 2) >> 2) & 0x1) * 4;
    let pos_y = (((y & !0x3) >> 1) + (y & 1)) & 0x7;
    let column_location = pos_y * width * 2 + ((x + swap_selector) & 0x7) * 4;
    let byte_num = ((y >> 1) & 1) + ((x >> 2) & 2);
    block_location + column_location + byte_num
}

/// Checks that a `width`x`height` 8bpp texture can be swizzled.
fn check_dimensions(width: usize, height: usize) -> Result<(), SwizzleError> {
    if width == 0 || height == 0 {
        return Err(unsupported(width, height, "empty texture"));
    }
    if width % 16 != 0 || height % 4 != 0 {
        return Err(unsupported(
            width,
            height,
            "8bpp textures must be multiples of 16x4 pixels",
        ));
    }
    Ok(())
}

/// Moves every pixel between its linear offset and its swizzled offset.
pub fn convert8(
    data: &[u8],
    width: usize,
    height: usize,
    direction: Direction,
) -> Result<Vec<u8>, SwizzleError> {
    check_dimensions(width, height).inspect_err(|e| error!("{}", e))?;
    check_len(data, width * height)?;
    debug!("8bpp {:?} {}x{}", direction, width, height);

    let mut output = vec![0u8; data.len()];
    for y in 0..height {
        for x in 0..width {
            let linear = y * width + x;
            let swizzled = swizzled_offset(x, y, width);
            match direction {
                Direction::Swizzle => output[swizzled] = data[linear],
                Direction::Unswizzle => output[linear] = data[swizzled],
            }
        }
    }
    Ok(output)
}

pub fn swizzle8(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, SwizzleError> {
    convert8(data, width, height, Direction::Swizzle)
}

pub fn unswizzle8(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, SwizzleError> {
    convert8(data, width, height, Direction::Unswizzle)
}
