use std::ops::Range;

use log::{debug, error, info};

use super::error::TextureError;
use super::format::{AlphaConvention, BitDepth, Palette, Raster};
use super::header::Header;
use super::profile::{ContainerProfile, PaletteOrder, PixelOrder};
use crate::swizzle::nibble::pack_nibbles;
use crate::swizzle::rows::convert_rows;
use crate::swizzle::{reorder_palette, swizzle4, swizzle8, Direction};

/// Re-encodes a standard MFZQ container from `template`.
pub fn encode(
    template: &[u8],
    raster: &Raster,
    palette: &Palette,
) -> Result<Vec<u8>, TextureError> {
    encode_with(&ContainerProfile::qtx(), template, raster, palette)
}

/// Returns a copy of `template` with its pixel and palette regions replaced.
///
/// The template is never modified and every byte outside the two regions is
/// carried over unchanged.
pub fn encode_with(
    profile: &ContainerProfile,
    template: &[u8],
    raster: &Raster,
    palette: &Palette,
) -> Result<Vec<u8>, TextureError> {
    info!("Starting encoding");

    // Step 1: Validate against the template header
    let header = Header::parse(profile, template)?;
    let layout = profile.layout(header.depth).ok_or_else(|| {
        error!("Profile {} has no {:?} layout", profile.name, header.depth);
        TextureError::UnsupportedFormat(profile.name.clone())
    })?;
    if raster.dimensions() != header.dimensions() {
        error!(
            "Raster is {:?}, template header is {:?}",
            raster.dimensions(),
            header.dimensions()
        );
        return Err(TextureError::DimensionMismatch {
            expected: header.dimensions(),
            actual: raster.dimensions(),
        });
    }
    if palette.len() != header.colors() {
        error!(
            "Palette has {} colors, {}bpp needs {}",
            palette.len(),
            header.depth.bits(),
            header.colors()
        );
        return Err(TextureError::PaletteSizeMismatch {
            expected: header.colors(),
            actual: palette.len(),
        });
    }
    if let Some((pixel, index)) = raster.find_out_of_range(header.colors()) {
        error!("Index {} at pixel #{} exceeds the palette", index, pixel);
        return Err(TextureError::IndexOutOfRange {
            pixel,
            index,
            colors: header.colors(),
        });
    }
    debug!("Template header validated");

    // Step 2: Pixel region
    let pixels = write_pixels(raster, &header, layout.pixels)?;
    debug!("Pixel region encoded to {} bytes", pixels.len());

    // Step 3: Palette region
    let stored_palette = write_palette(palette, profile.palette_order, layout.alpha);
    debug!("Palette region encoded to {} bytes", stored_palette.len());

    // Step 4: Copy and splice
    let mut output = template.to_vec();
    splice_region(&mut output, header.pixels.clone(), &pixels)?;
    splice_region(&mut output, header.palette.clone(), &stored_palette)?;
    if output.len() != template.len() {
        error!("Output length {} differs from template {}", output.len(), template.len());
        return Err(TextureError::SizeMismatch {
            expected: template.len(),
            actual: output.len(),
        });
    }

    info!("Encoding process completed successfully");
    Ok(output)
}

fn write_palette(palette: &Palette, order: PaletteOrder, alpha: AlphaConvention) -> Vec<u8> {
    let linear: Vec<u8> = palette
        .colors
        .iter()
        .flat_map(|&color| alpha.encode(color))
        .collect();
    match order {
        PaletteOrder::Interleaved => reorder_palette(&linear),
        PaletteOrder::Linear => linear,
    }
}

/// Raster to the stored pixel region.
fn write_pixels(
    raster: &Raster,
    header: &Header,
    order: PixelOrder,
) -> Result<Vec<u8>, TextureError> {
    let (width, height) = (header.width as usize, header.height as usize);
    let geometry = || TextureError::from_swizzle(header.width, header.height);
    let indices = raster.indices();

    let stored = match (order, header.depth) {
        (PixelOrder::Swizzled(tiles), depth) => {
            let (strip_width, strip_height) =
                tiles.strip_dimensions(width, height).map_err(geometry())?;
            let strip = tiles
                .raster_to_strip(indices, width, height)
                .map_err(geometry())?;
            debug!("Swizzling a {}x{} strip", strip_width, strip_height);
            match depth {
                BitDepth::Four => {
                    swizzle4(&pack_nibbles(&strip), strip_width, strip_height).map_err(geometry())?
                }
                BitDepth::Eight => swizzle8(&strip, strip_width, strip_height).map_err(geometry())?,
            }
        }
        (PixelOrder::HalfRowSwap { min_width }, BitDepth::Eight) if header.width > min_width => {
            convert_rows(indices, width, height, Direction::Swizzle).map_err(geometry())?
        }
        (_, BitDepth::Four) => pack_nibbles(indices),
        (_, BitDepth::Eight) => indices.to_vec(),
    };
    Ok(stored)
}

/// Writes `replacement` over `range` of `buffer`, which must be exactly as
/// long as the range.
fn splice_region(
    buffer: &mut [u8],
    range: Range<usize>,
    replacement: &[u8],
) -> Result<(), TextureError> {
    if replacement.len() != range.len() {
        error!(
            "Region {:X?} is {} bytes, replacement is {}",
            range,
            range.len(),
            replacement.len()
        );
        return Err(TextureError::SizeMismatch {
            expected: range.len(),
            actual: replacement.len(),
        });
    }
    let needed = range.end;
    let actual = buffer.len();
    let region = buffer
        .get_mut(range)
        .ok_or(TextureError::TruncatedData { needed, actual })?;
    region.copy_from_slice(replacement);
    Ok(())
}

/// Copy of `target` with `replacement` written at `offset`.
///
/// The result always has the length of `target`; a replacement that would run
/// past its end is rejected.
pub fn splice(target: &[u8], offset: usize, replacement: &[u8]) -> Result<Vec<u8>, TextureError> {
    let end = offset
        .checked_add(replacement.len())
        .ok_or(TextureError::TruncatedData {
            needed: usize::MAX,
            actual: target.len(),
        })?;
    if end > target.len() {
        error!(
            "Splice of {} bytes at {:#X} runs past {} bytes",
            replacement.len(),
            offset,
            target.len()
        );
        return Err(TextureError::TruncatedData {
            needed: end,
            actual: target.len(),
        });
    }
    let mut output = target.to_vec();
    splice_region(&mut output, offset..end, replacement)?;
    Ok(output)
}
