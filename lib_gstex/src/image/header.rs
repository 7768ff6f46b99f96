use std::ops::Range;

use log::{debug, error};

use super::error::TextureError;
use super::format::BitDepth;
use super::profile::{ContainerProfile, HeaderField};

/// Parsed container header with the region ranges derived from it.
///
/// Region ranges are computed once here; nothing else recomputes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub width: u32,
    pub height: u32,
    pub depth: BitDepth,
    pub pixels: Range<usize>,
    pub palette: Range<usize>,
}

impl Header {
    pub fn parse(profile: &ContainerProfile, data: &[u8]) -> Result<Self, TextureError> {
        if !data.starts_with(&profile.magic) {
            let found = data.get(..profile.magic.len()).unwrap_or(data);
            error!("Magic {:02X?} does not match profile {}", found, profile.name);
            return Err(TextureError::UnsupportedFormat(format!(
                "magic {:02X?} is not {}",
                found, profile.name
            )));
        }
        let header_len = profile.header_len();
        if data.len() < header_len {
            error!(
                "{} header needs {} bytes, got {}",
                profile.name,
                header_len,
                data.len()
            );
            return Err(TextureError::TruncatedData {
                needed: header_len,
                actual: data.len(),
            });
        }

        let field = |field: &HeaderField| {
            field.read(data).ok_or(TextureError::TruncatedData {
                needed: field.end(),
                actual: data.len(),
            })
        };
        let flag = field(&profile.depth_flag)?;
        let width = field(&profile.width)?;
        let height = field(&profile.height)?;
        debug!(
            "{} header: flag=0x{:02X} width={} height={}",
            profile.name, flag, width, height
        );

        let depth = BitDepth::from_flag(flag).ok_or_else(|| {
            error!("Unrecognized bit depth flag 0x{:02X}", flag);
            TextureError::UnsupportedFormat(format!("bit depth flag 0x{:02X}", flag))
        })?;
        if profile.layout(depth).is_none() {
            error!("Profile {} has no {:?} layout", profile.name, depth);
            return Err(TextureError::UnsupportedFormat(format!(
                "{} does not hold {}bpp textures",
                profile.name,
                depth.bits()
            )));
        }

        let (pixels, palette) = regions(profile, width, height, depth)?;
        let needed = pixels.end.max(palette.end);
        if data.len() < needed {
            error!("Container is {} bytes, regions end at {}", data.len(), needed);
            return Err(TextureError::TruncatedData {
                needed,
                actual: data.len(),
            });
        }
        debug!("Pixel region {:X?}, palette region {:X?}", pixels, palette);

        Ok(Self {
            width,
            height,
            depth,
            pixels,
            palette,
        })
    }

    /// Builds a zero-filled container with only the header fields written,
    /// sized to the end of its last region.
    pub fn stamp(
        profile: &ContainerProfile,
        width: u32,
        height: u32,
        depth: BitDepth,
    ) -> Result<Vec<u8>, TextureError> {
        if profile.layout(depth).is_none() {
            return Err(TextureError::UnsupportedFormat(format!(
                "{} does not hold {}bpp textures",
                profile.name,
                depth.bits()
            )));
        }
        let (pixels, palette) = regions(profile, width, height, depth)?;
        let mut data = vec![0u8; pixels.end.max(palette.end).max(profile.header_len())];
        data[..profile.magic.len()].copy_from_slice(&profile.magic);

        let fields = [
            (&profile.width, width),
            (&profile.height, height),
            (&profile.depth_flag, depth.flag()),
        ];
        for (field, value) in fields {
            if field.write(&mut data, value).is_none() {
                error!("{} does not fit a {:?} header field", value, field.width);
                return Err(TextureError::UnsupportedDimensions { width, height });
            }
        }
        debug!("Stamped {} bytes of {} for {}x{}", data.len(), profile.name, width, height);
        Ok(data)
    }

    pub fn colors(&self) -> usize {
        self.depth.colors()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Bytes the regions span, trailing data not included.
    pub fn container_len(&self) -> usize {
        self.pixels.end.max(self.palette.end)
    }
}

fn regions(
    profile: &ContainerProfile,
    width: u32,
    height: u32,
    depth: BitDepth,
) -> Result<(Range<usize>, Range<usize>), TextureError> {
    depth
        .pixel_bytes(width, height)
        .and_then(|pixel_len| profile.regions.regions(pixel_len, depth.colors() * 4))
        .ok_or_else(|| {
            error!("Regions of a {}x{} texture overflow", width, height);
            TextureError::UnsupportedDimensions { width, height }
        })
}

impl ContainerProfile {
    /// Fresh container for a `width`x`height` texture of `depth`.
    pub fn blank(&self, width: u32, height: u32, depth: BitDepth) -> Result<Vec<u8>, TextureError> {
        Header::stamp(self, width, height, depth)
    }
}

/// Finds the first built-in profile whose header parses.
///
/// A truncated container is reported as such rather than as a foreign one.
pub fn probe(data: &[u8]) -> Result<(ContainerProfile, Header), TextureError> {
    let mut failure: Option<TextureError> = None;
    for profile in ContainerProfile::builtin() {
        match Header::parse(&profile, data) {
            Ok(header) => {
                debug!("Probed container as {}", profile.name);
                return Ok((profile, header));
            }
            Err(err) => {
                let foreign = matches!(err, TextureError::UnsupportedFormat(_));
                let have_specific = matches!(
                    failure,
                    Some(ref f) if !matches!(f, TextureError::UnsupportedFormat(_))
                );
                if failure.is_none() || (!foreign && !have_specific) {
                    failure = Some(err);
                }
            }
        }
    }
    Err(failure
        .unwrap_or_else(|| TextureError::UnsupportedFormat("no known container".to_string())))
}
