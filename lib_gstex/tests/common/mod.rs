#![allow(dead_code)]

use lib_gstex::{AlphaConvention, BitDepth, ContainerProfile, Palette, Raster};

/// Deterministic xorshift byte source.
pub struct Noise(u32);

impl Noise {
    pub fn new(seed: u32) -> Self {
        Noise(seed.wrapping_mul(2_654_435_761) | 1)
    }

    pub fn next_byte(&mut self) -> u8 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        (self.0 >> 8) as u8
    }

    pub fn bytes(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| self.next_byte()).collect()
    }
}

pub fn random_raster(width: u32, height: u32, depth: BitDepth, seed: u32) -> Raster {
    let mut noise = Noise::new(seed);
    let mask = (depth.colors() - 1) as u8;
    Raster::from_fn(width, height, |_, _| noise.next_byte() & mask)
}

/// A palette whose alpha values survive a store and reload under `alpha`.
pub fn random_palette(depth: BitDepth, alpha: AlphaConvention, seed: u32) -> Palette {
    let mut noise = Noise::new(seed ^ 0x5A5A);
    let colors = (0..depth.colors())
        .map(|_| {
            let [r, g, b, a] = [(); 4].map(|_| noise.next_byte());
            let stored = match alpha {
                AlphaConvention::HalfScale => [r, g, b, a % 0x81],
                _ => [r, g, b, a],
            };
            alpha.decode(stored)
        })
        .collect();
    Palette::new(colors)
}

/// A stamped container whose bytes past the header are noise, with
/// `trailing` extra bytes of noise after the last region.
pub fn noisy_template(
    profile: &ContainerProfile,
    width: u32,
    height: u32,
    depth: BitDepth,
    trailing: usize,
    seed: u32,
) -> Vec<u8> {
    let mut data = profile.blank(width, height, depth).unwrap();
    let mut noise = Noise::new(seed);
    let header_len = profile.header_len();
    for byte in &mut data[header_len..] {
        *byte = noise.next_byte();
    }
    data.extend(noise.bytes(trailing));
    data
}

/// 64-bit FNV-1a, used to pin decoded output without storing it.
pub fn fnv1a(data: &[u8]) -> u64 {
    data.iter().fold(0xcbf2_9ce4_8422_2325, |hash, &byte| {
        (hash ^ byte as u64).wrapping_mul(0x0100_0000_01b3)
    })
}
