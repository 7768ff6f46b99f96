use serde::{Deserialize, Serialize};

use super::error::TextureError;

/// One RGBA palette entry.
pub type Color = [u8; 4];

/// Opaque black, used for palette entries a source image does not define.
pub const DEFAULT_COLOR: Color = [0, 0, 0, 255];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BitDepth {
    /// 16-color textures, two pixels per byte.
    Four,
    /// 256-color textures, one pixel per byte.
    Eight,
}

impl BitDepth {
    pub const FLAG_8BPP: u32 = 0x13;
    pub const FLAG_4BPP: u32 = 0x14;

    pub fn from_flag(flag: u32) -> Option<Self> {
        match flag {
            Self::FLAG_4BPP => Some(BitDepth::Four),
            Self::FLAG_8BPP => Some(BitDepth::Eight),
            _ => None,
        }
    }

    pub fn flag(self) -> u32 {
        match self {
            BitDepth::Four => Self::FLAG_4BPP,
            BitDepth::Eight => Self::FLAG_8BPP,
        }
    }

    pub fn bits(self) -> usize {
        match self {
            BitDepth::Four => 4,
            BitDepth::Eight => 8,
        }
    }

    /// Palette entries a texture of this depth carries.
    pub fn colors(self) -> usize {
        1 << self.bits()
    }

    /// Size of the packed pixel region, `None` on overflow.
    pub fn pixel_bytes(self, width: u32, height: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(self.bits())
            .map(|bits| bits / 8)
    }
}

/// A grid of palette indices, row-major, one index per byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Raster {
    width: u32,
    height: u32,
    indices: Vec<u8>,
}

impl Raster {
    pub fn new(width: u32, height: u32, indices: Vec<u8>) -> Result<Self, TextureError> {
        let expected = width as usize * height as usize;
        if indices.len() != expected {
            return Err(TextureError::InvalidRaster {
                width,
                height,
                expected,
                actual: indices.len(),
            });
        }
        Ok(Self {
            width,
            height,
            indices,
        })
    }

    pub fn filled(width: u32, height: u32, index: u8) -> Self {
        Self {
            width,
            height,
            indices: vec![index; width as usize * height as usize],
        }
    }

    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> u8) -> Self {
        let indices = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();
        Self {
            width,
            height,
            indices,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.indices
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// First pixel whose index does not fit `colors`.
    pub(crate) fn find_out_of_range(&self, colors: usize) -> Option<(usize, u8)> {
        self.indices
            .iter()
            .position(|&index| index as usize >= colors)
            .map(|pixel| (pixel, self.indices[pixel]))
    }
}

/// Transparency metadata an indexed image editor attaches to its palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transparency {
    /// Alpha per palette index; indices past the end are opaque.
    PerIndex(Vec<u8>),
    /// One fully transparent index, everything else opaque.
    Single(u8),
}

impl Transparency {
    fn alpha(&self, index: usize) -> u8 {
        match self {
            Transparency::PerIndex(alphas) => alphas.get(index).copied().unwrap_or(255),
            Transparency::Single(transparent) if *transparent as usize == index => 0,
            Transparency::Single(_) => 255,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub colors: Vec<Color>,
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> Self {
        Self { colors }
    }

    /// Builds the full palette of `depth` from RGB triples and optional
    /// transparency metadata.
    ///
    /// Entries the source does not define become [`DEFAULT_COLOR`]; a source
    /// with more entries than the depth allows is rejected.
    pub fn from_rgb(
        depth: BitDepth,
        rgb: &[[u8; 3]],
        transparency: Option<&Transparency>,
    ) -> Result<Self, TextureError> {
        let expected = depth.colors();
        if rgb.len() > expected {
            return Err(TextureError::PaletteSizeMismatch {
                expected,
                actual: rgb.len(),
            });
        }

        let colors = (0..expected)
            .map(|index| {
                let [r, g, b, mut a] = match rgb.get(index) {
                    Some(&[r, g, b]) => [r, g, b, 255],
                    None => DEFAULT_COLOR,
                };
                if let Some(transparency) = transparency {
                    a = transparency.alpha(index);
                }
                [r, g, b, a]
            })
            .collect();
        Ok(Self { colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// How a container stores the alpha channel of its palette entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlphaConvention {
    /// Hardware alpha, 0x80 is fully opaque.
    HalfScale,
    /// Pure black entries are transparent, everything else opaque.
    BlackTransparent,
    /// Alpha is ignored on read and written as 0x80.
    Opaque,
    /// Alpha bytes are copied unchanged.
    Verbatim,
}

impl AlphaConvention {
    pub const HARDWARE_OPAQUE: u8 = 0x80;

    /// Stored entry to RGBA.
    pub fn decode(self, [r, g, b, a]: Color) -> Color {
        let alpha = match self {
            AlphaConvention::HalfScale if a >= Self::HARDWARE_OPAQUE => 255,
            AlphaConvention::HalfScale => a * 2,
            AlphaConvention::BlackTransparent if [r, g, b] == [0, 0, 0] => 0,
            AlphaConvention::BlackTransparent | AlphaConvention::Opaque => 255,
            AlphaConvention::Verbatim => a,
        };
        [r, g, b, alpha]
    }

    /// RGBA to stored entry.
    pub fn encode(self, [r, g, b, a]: Color) -> Color {
        let alpha = match self {
            AlphaConvention::HalfScale if a == 255 => Self::HARDWARE_OPAQUE,
            AlphaConvention::HalfScale => a / 2,
            AlphaConvention::BlackTransparent if [r, g, b] == [0, 0, 0] => 0,
            AlphaConvention::BlackTransparent | AlphaConvention::Opaque => Self::HARDWARE_OPAQUE,
            AlphaConvention::Verbatim => a,
        };
        [r, g, b, alpha]
    }
}

/// A decoded texture: its bit depth, index raster and RGBA palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    pub depth: BitDepth,
    pub raster: Raster,
    pub palette: Palette,
}
