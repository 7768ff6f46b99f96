//! Container profiles.
//!
//! A [`ContainerProfile`] is the whole description of one container variant:
//! where its header fields live, how its regions are laid out, and how pixels
//! and palette entries of each bit depth are stored. The codec is driven by a
//! profile and holds no other format knowledge.

use std::ops::Range;

use log::debug;
use serde::{Deserialize, Serialize};

use super::error::TextureError;
use super::format::{AlphaConvention, BitDepth};
use crate::swizzle::TileLayout;

pub const QTX_MAGIC: &[u8] = b"MFZQ";
pub const GS_MAGIC: &[u8] = b"GS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldWidth {
    U8,
    U16,
    U32,
}

impl FieldWidth {
    pub fn bytes(self) -> usize {
        match self {
            FieldWidth::U8 => 1,
            FieldWidth::U16 => 2,
            FieldWidth::U32 => 4,
        }
    }

    pub fn max_value(self) -> u32 {
        match self {
            FieldWidth::U8 => u8::MAX as u32,
            FieldWidth::U16 => u16::MAX as u32,
            FieldWidth::U32 => u32::MAX,
        }
    }
}

/// A little-endian unsigned header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderField {
    pub offset: usize,
    pub width: FieldWidth,
}

impl HeaderField {
    pub const fn new(offset: usize, width: FieldWidth) -> Self {
        Self { offset, width }
    }

    pub fn end(&self) -> usize {
        self.offset + self.width.bytes()
    }

    /// Reads the field, `None` if `data` ends before it.
    pub fn read(&self, data: &[u8]) -> Option<u32> {
        let bytes = data.get(self.offset..self.end())?;
        let mut buf = [0u8; 4];
        buf[..bytes.len()].copy_from_slice(bytes);
        Some(u32::from_le_bytes(buf))
    }

    /// Writes `value`, `None` if it does not fit the field or `data`.
    pub fn write(&self, data: &mut [u8], value: u32) -> Option<()> {
        if value > self.width.max_value() {
            return None;
        }
        let end = self.end();
        let slot = data.get_mut(self.offset..end)?;
        slot.copy_from_slice(&value.to_le_bytes()[..self.width.bytes()]);
        Some(())
    }
}

/// Placement of the pixel and palette regions inside a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionLayout {
    /// Pixels at a fixed offset, the palette `palette_gap` bytes after them.
    PixelsFirst {
        pixel_offset: usize,
        palette_gap: usize,
    },
    /// Palette at a fixed offset, pixels at `min_pixel_offset` or right after
    /// the palette, whichever is later.
    PaletteFirst {
        palette_offset: usize,
        min_pixel_offset: usize,
    },
}

impl RegionLayout {
    /// `(pixels, palette)` byte ranges, `None` on overflow.
    pub fn regions(
        &self,
        pixel_len: usize,
        palette_len: usize,
    ) -> Option<(Range<usize>, Range<usize>)> {
        match *self {
            RegionLayout::PixelsFirst {
                pixel_offset,
                palette_gap,
            } => {
                let pixel_end = pixel_offset.checked_add(pixel_len)?;
                let palette_start = pixel_end.checked_add(palette_gap)?;
                let palette_end = palette_start.checked_add(palette_len)?;
                Some((pixel_offset..pixel_end, palette_start..palette_end))
            }
            RegionLayout::PaletteFirst {
                palette_offset,
                min_pixel_offset,
            } => {
                let palette_end = palette_offset.checked_add(palette_len)?;
                let pixel_start = min_pixel_offset.max(palette_end);
                let pixel_end = pixel_start.checked_add(pixel_len)?;
                Some((pixel_start..pixel_end, palette_offset..palette_end))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaletteOrder {
    /// Stripes of eight entries swapped in every group of 32 (256 colors).
    Interleaved,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelOrder {
    /// Tiled through the swizzle strip.
    Swizzled(TileLayout),
    /// Row-major, 4bpp packed low nibble first.
    Linear,
    /// 8bpp rows wider than `min_width` have their halves swapped; anything
    /// else is linear.
    HalfRowSwap { min_width: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthLayout {
    pub pixels: PixelOrder,
    pub alpha: AlphaConvention,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerProfile {
    pub name: String,
    /// Bytes the container starts with.
    pub magic: Vec<u8>,
    pub width: HeaderField,
    pub height: HeaderField,
    pub depth_flag: HeaderField,
    pub regions: RegionLayout,
    pub palette_order: PaletteOrder,
    /// `None` when the variant has no 4bpp textures.
    pub four: Option<DepthLayout>,
    /// `None` when the variant has no 8bpp textures.
    pub eight: Option<DepthLayout>,
}

impl ContainerProfile {
    /// Standard MFZQ texture.
    pub fn qtx() -> Self {
        Self {
            name: "qtx".to_string(),
            magic: QTX_MAGIC.to_vec(),
            width: HeaderField::new(0x30, FieldWidth::U32),
            height: HeaderField::new(0x34, FieldWidth::U32),
            depth_flag: HeaderField::new(0x40, FieldWidth::U8),
            regions: RegionLayout::PixelsFirst {
                pixel_offset: 0x200,
                palette_gap: 0x80,
            },
            palette_order: PaletteOrder::Interleaved,
            four: Some(DepthLayout {
                pixels: PixelOrder::Swizzled(TileLayout::STANDARD4),
                alpha: AlphaConvention::HalfScale,
            }),
            eight: Some(DepthLayout {
                pixels: PixelOrder::Swizzled(TileLayout::STANDARD8),
                alpha: AlphaConvention::HalfScale,
            }),
        }
    }

    /// MFZQ font sheet: 4bpp only, 128x128 tiles in plain order.
    pub fn qtx_font() -> Self {
        Self {
            name: "qtx_font".to_string(),
            four: Some(DepthLayout {
                pixels: PixelOrder::Swizzled(TileLayout::FONT4),
                alpha: AlphaConvention::HalfScale,
            }),
            eight: None,
            ..Self::qtx()
        }
    }

    /// Legacy GS texture, 8bpp alpha forced opaque.
    pub fn gs() -> Self {
        Self {
            name: "gs".to_string(),
            magic: GS_MAGIC.to_vec(),
            depth_flag: HeaderField::new(2, FieldWidth::U16),
            width: HeaderField::new(4, FieldWidth::U16),
            height: HeaderField::new(6, FieldWidth::U16),
            regions: RegionLayout::PaletteFirst {
                palette_offset: 0x10,
                min_pixel_offset: 0x50,
            },
            palette_order: PaletteOrder::Linear,
            four: Some(DepthLayout {
                pixels: PixelOrder::Linear,
                alpha: AlphaConvention::BlackTransparent,
            }),
            eight: Some(DepthLayout {
                pixels: PixelOrder::HalfRowSwap { min_width: 64 },
                alpha: AlphaConvention::Opaque,
            }),
        }
    }

    /// Legacy GS texture keeping stored 8bpp alpha bytes as they are.
    pub fn gs_preserve_alpha() -> Self {
        let gs = Self::gs();
        Self {
            name: "gs_preserve_alpha".to_string(),
            eight: gs.eight.map(|layout| DepthLayout {
                alpha: AlphaConvention::Verbatim,
                ..layout
            }),
            ..gs
        }
    }

    /// Profiles tried by [`probe`](super::header::probe), in order.
    pub fn builtin() -> Vec<Self> {
        vec![Self::qtx(), Self::qtx_font(), Self::gs(), Self::gs_preserve_alpha()]
    }

    pub fn layout(&self, depth: BitDepth) -> Option<&DepthLayout> {
        match depth {
            BitDepth::Four => self.four.as_ref(),
            BitDepth::Eight => self.eight.as_ref(),
        }
    }

    /// Bytes needed before any header field can be read.
    pub fn header_len(&self) -> usize {
        [self.width.end(), self.height.end(), self.depth_flag.end(), self.magic.len()]
            .into_iter()
            .max()
            .unwrap_or(0)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TextureError> {
        let bytes = bincode::serialize(self)?;
        debug!("Profile {} serialized to {} bytes", self.name, bytes.len());
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TextureError> {
        let profile: Self = bincode::deserialize(bytes)?;
        debug!("Profile {} loaded", profile.name);
        Ok(profile)
    }
}
