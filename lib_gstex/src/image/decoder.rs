use log::{debug, error, info};

use super::error::TextureError;
use super::format::{AlphaConvention, BitDepth, Palette, Raster, Texture};
use super::header::Header;
use super::profile::{ContainerProfile, PaletteOrder, PixelOrder};
use crate::swizzle::nibble::unpack_nibbles;
use crate::swizzle::rows::convert_rows;
use crate::swizzle::{reorder_palette, unswizzle4, unswizzle8, Direction};

/// Decodes a standard MFZQ container.
pub fn decode(data: &[u8]) -> Result<Texture, TextureError> {
    decode_with(&ContainerProfile::qtx(), data)
}

pub fn decode_with(profile: &ContainerProfile, data: &[u8]) -> Result<Texture, TextureError> {
    let header = Header::parse(profile, data)?;
    let layout = profile.layout(header.depth).ok_or_else(|| {
        error!("Profile {} has no {:?} layout", profile.name, header.depth);
        TextureError::UnsupportedFormat(profile.name.clone())
    })?;
    info!(
        "Decoding {}x{} {}bpp {} texture",
        header.width,
        header.height,
        header.depth.bits(),
        profile.name
    );

    // Step 1: Palette
    let palette = read_palette(&data[header.palette.clone()], profile.palette_order, layout.alpha);
    debug!("Palette read with {} colors", palette.len());

    // Step 2: Pixels
    let samples = read_pixels(&data[header.pixels.clone()], &header, layout.pixels)?;
    debug!("Unswizzled {} pixel samples", samples.len());
    let raster = Raster::new(header.width, header.height, samples)?;

    info!("Decoding completed successfully");
    Ok(Texture {
        depth: header.depth,
        raster,
        palette,
    })
}

fn read_palette(raw: &[u8], order: PaletteOrder, alpha: AlphaConvention) -> Palette {
    let linear = match order {
        PaletteOrder::Interleaved => reorder_palette(raw),
        PaletteOrder::Linear => raw.to_vec(),
    };
    let colors = linear
        .chunks_exact(4)
        .map(|entry| alpha.decode([entry[0], entry[1], entry[2], entry[3]]))
        .collect();
    Palette::new(colors)
}

/// Stored pixel region to one index per pixel, row-major.
fn read_pixels(raw: &[u8], header: &Header, order: PixelOrder) -> Result<Vec<u8>, TextureError> {
    let (width, height) = (header.width as usize, header.height as usize);
    let geometry = || TextureError::from_swizzle(header.width, header.height);

    let samples = match (order, header.depth) {
        (PixelOrder::Swizzled(tiles), depth) => {
            let (strip_width, strip_height) =
                tiles.strip_dimensions(width, height).map_err(geometry())?;
            debug!("Unswizzling through a {}x{} strip", strip_width, strip_height);
            let strip = match depth {
                BitDepth::Four => {
                    unpack_nibbles(&unswizzle4(raw, strip_width, strip_height).map_err(geometry())?)
                }
                BitDepth::Eight => unswizzle8(raw, strip_width, strip_height).map_err(geometry())?,
            };
            tiles
                .strip_to_raster(&strip, width, height)
                .map_err(geometry())?
        }
        (PixelOrder::HalfRowSwap { min_width }, BitDepth::Eight) if header.width > min_width => {
            convert_rows(raw, width, height, Direction::Unswizzle).map_err(geometry())?
        }
        (_, BitDepth::Four) => {
            let mut samples = unpack_nibbles(raw);
            samples.truncate(width * height);
            samples
        }
        (_, BitDepth::Eight) => raw.to_vec(),
    };
    Ok(samples)
}
