//! Half-row swap of wide legacy 8bpp textures.
//!
//! Displayed row `y` takes its left half from the right half of stored row
//! `y`, and its right half from the left half of stored row `y + 1`
//! (wrapping to row 0 at the bottom).

use super::{check_len, unsupported, Direction, SwizzleError};

pub fn convert_rows(
    data: &[u8],
    width: usize,
    height: usize,
    direction: Direction,
) -> Result<Vec<u8>, SwizzleError> {
    if width == 0 || height == 0 || width % 2 != 0 {
        return Err(unsupported(width, height, "half-row swap needs an even width"));
    }
    check_len(data, width * height)?;

    let half = width / 2;
    let mut output = vec![0u8; data.len()];
    for y in 0..height {
        let next = (y + 1) % height;
        let row = y * width;
        // (stored range, displayed range)
        let moves = [
            (row + half, row),
            (next * width, row + half),
        ];
        for (stored, displayed) in moves {
            match direction {
                Direction::Unswizzle => output[displayed..displayed + half]
                    .copy_from_slice(&data[stored..stored + half]),
                Direction::Swizzle => output[stored..stored + half]
                    .copy_from_slice(&data[displayed..displayed + half]),
            }
        }
    }
    Ok(output)
}
