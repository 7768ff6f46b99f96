mod common;

use common::{noisy_template, random_palette, random_raster, Noise};
use lib_gstex::{
    decode, decode_with, encode, encode_with, probe, AlphaConvention, BitDepth, ContainerProfile,
    Header, Palette, Raster, TextureError, Transparency,
};
use rstest::rstest;

fn alpha_of(profile: &ContainerProfile, depth: BitDepth) -> AlphaConvention {
    profile.layout(depth).unwrap().alpha
}

fn assert_round_trip(
    profile: &ContainerProfile,
    width: u32,
    height: u32,
    depth: BitDepth,
    seed: u32,
) {
    let template = noisy_template(profile, width, height, depth, 0, seed);
    let raster = random_raster(width, height, depth, seed);
    let palette = random_palette(depth, alpha_of(profile, depth), seed);

    let encoded = encode_with(profile, &template, &raster, &palette).unwrap();
    assert_eq!(encoded.len(), template.len());

    let texture = decode_with(profile, &encoded).unwrap();
    assert_eq!(texture.depth, depth);
    assert_eq!(texture.raster, raster);
    assert_eq!(texture.palette, palette);

    // stored bytes are reproduced exactly
    assert_eq!(encode_with(profile, &encoded, &texture.raster, &texture.palette).unwrap(), encoded);
}

#[rstest]
#[case(128, 128)]
#[case(128, 64)]
#[case(128, 192)]
#[case(64, 64)]
#[case(32, 16)]
#[case(256, 64)]
#[case(256, 128)]
#[case(384, 64)]
#[case(512, 64)]
#[case(512, 128)]
#[case(512, 256)]
#[case(640, 64)]
#[case(640, 128)]
#[case(768, 256)]
#[case(768, 384)]
#[case(1024, 512)]
fn test_round_trip_qtx_4bpp(#[case] width: u32, #[case] height: u32) {
    assert_round_trip(&ContainerProfile::qtx(), width, height, BitDepth::Four, width ^ height);
}

#[rstest]
#[case(16, 4)]
#[case(64, 64)]
#[case(128, 64)]
#[case(128, 128)]
#[case(256, 128)]
#[case(512, 512)]
fn test_round_trip_qtx_8bpp(#[case] width: u32, #[case] height: u32) {
    assert_round_trip(&ContainerProfile::qtx(), width, height, BitDepth::Eight, width + height);
}

#[rstest]
#[case(64, 32)]
#[case(128, 128)]
#[case(256, 128)]
#[case(1024, 512)]
fn test_round_trip_qtx_font(#[case] width: u32, #[case] height: u32) {
    assert_round_trip(&ContainerProfile::qtx_font(), width, height, BitDepth::Four, width);
}

#[rstest]
#[case(BitDepth::Four, 32, 32)]
#[case(BitDepth::Four, 30, 10)]
#[case(BitDepth::Eight, 64, 32)]
#[case(BitDepth::Eight, 128, 16)]
#[case(BitDepth::Eight, 100, 3)]
fn test_round_trip_gs(#[case] depth: BitDepth, #[case] width: u32, #[case] height: u32) {
    assert_round_trip(&ContainerProfile::gs(), width, height, depth, height);
    assert_round_trip(&ContainerProfile::gs_preserve_alpha(), width, height, depth, width);
}

#[test]
fn test_all_zero_4bpp_page() {
    let profile = ContainerProfile::qtx();
    let template = profile.blank(128, 128, BitDepth::Four).unwrap();
    let raster = Raster::filled(128, 128, 0);
    let palette = Palette::new(vec![[0, 0, 0, 255]; 16]);

    let encoded = encode(&template, &raster, &palette).unwrap();
    let header = Header::parse(&profile, &encoded).unwrap();
    assert_eq!(header.pixels.len(), 128 * 128 * 4 / 8);
    assert!(encoded[header.pixels.clone()].iter().all(|&b| b == 0));

    let texture = decode(&encoded).unwrap();
    assert!(texture.raster.indices().iter().all(|&i| i == 0));
    assert_eq!(texture.palette, palette);
}

#[test]
fn test_diagonal_8bpp() {
    let template = ContainerProfile::qtx().blank(64, 64, BitDepth::Eight).unwrap();
    let raster = Raster::from_fn(64, 64, |x, y| ((x + y) % 256) as u8);
    let palette = random_palette(BitDepth::Eight, AlphaConvention::HalfScale, 7);

    let encoded = encode(&template, &raster, &palette).unwrap();
    assert_ne!(&encoded[0x200..0x200 + 64], &raster.indices()[..64]);
    assert_eq!(decode(&encoded).unwrap().raster, raster);
}

#[test]
fn test_half_scale_alpha_is_stored() {
    let template = ContainerProfile::qtx().blank(32, 16, BitDepth::Four).unwrap();
    let mut colors = vec![[0, 0, 0, 255]; 16];
    colors[1] = [10, 20, 30, 0x40];
    let encoded = encode(&template, &Raster::filled(32, 16, 1), &Palette::new(colors)).unwrap();

    let header = Header::parse(&ContainerProfile::qtx(), &encoded).unwrap();
    let stored = &encoded[header.palette];
    assert_eq!(stored[..8], [0, 0, 0, 0x80, 10, 20, 30, 0x20]);
}

#[test]
fn test_gs_8bpp_alpha_profiles() {
    let mut data = ContainerProfile::gs().blank(16, 4, BitDepth::Eight).unwrap();
    data[0x10..0x14].copy_from_slice(&[1, 2, 3, 0x33]);

    let forced = decode_with(&ContainerProfile::gs(), &data).unwrap();
    assert_eq!(forced.palette.colors[0], [1, 2, 3, 255]);
    let kept = decode_with(&ContainerProfile::gs_preserve_alpha(), &data).unwrap();
    assert_eq!(kept.palette.colors[0], [1, 2, 3, 0x33]);
}

#[test]
fn test_gs_4bpp_black_is_transparent() {
    let mut data = ContainerProfile::gs().blank(4, 2, BitDepth::Four).unwrap();
    data[0x14..0x18].copy_from_slice(&[9, 0, 0, 0]);
    data[0x50..0x54].copy_from_slice(&[0x10, 0x32, 0x54, 0x76]);

    let texture = decode_with(&ContainerProfile::gs(), &data).unwrap();
    assert_eq!(texture.palette.colors[0], [0, 0, 0, 0]);
    assert_eq!(texture.palette.colors[1], [9, 0, 0, 255]);
    assert_eq!(texture.raster.indices(), &[0, 1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn test_gs_wide_8bpp_half_rows() {
    let (width, height) = (128u32, 2u32);
    let mut data = ContainerProfile::gs().blank(width, height, BitDepth::Eight).unwrap();
    // stored row 0 is all 1s, row 1 all 2s
    data[0x410..0x410 + 128].fill(1);
    data[0x410 + 128..].fill(2);

    let raster = decode_with(&ContainerProfile::gs(), &data).unwrap().raster;
    assert_eq!(raster.get(0, 0), Some(1));
    assert_eq!(raster.get(64, 0), Some(2));
    assert_eq!(raster.get(0, 1), Some(2));
    assert_eq!(raster.get(127, 1), Some(1));
}

#[test]
fn test_template_preserved_outside_regions() {
    let profile = ContainerProfile::qtx();
    let template = noisy_template(&profile, 256, 128, BitDepth::Four, 4096, 99);
    let original = template.clone();
    let raster = random_raster(256, 128, BitDepth::Four, 1);
    let palette = random_palette(BitDepth::Four, AlphaConvention::HalfScale, 1);

    let encoded = encode(&template, &raster, &palette).unwrap();
    assert_eq!(template, original);
    assert_eq!(encoded.len(), template.len());

    let header = Header::parse(&profile, &template).unwrap();
    for (offset, (&before, &after)) in template.iter().zip(&encoded).enumerate() {
        if !header.pixels.contains(&offset) && !header.palette.contains(&offset) {
            assert_eq!(before, after, "byte {:#X} changed", offset);
        }
    }
}

#[test]
fn test_dimension_mismatch() {
    let template = ContainerProfile::qtx().blank(128, 128, BitDepth::Four).unwrap();
    let raster = Raster::filled(128, 64, 0);
    let palette = Palette::new(vec![[0; 4]; 16]);
    assert!(matches!(
        encode(&template, &raster, &palette),
        Err(TextureError::DimensionMismatch {
            expected: (128, 128),
            actual: (128, 64)
        })
    ));
}

#[test]
fn test_palette_size_mismatch() {
    let template = ContainerProfile::qtx().blank(128, 64, BitDepth::Eight).unwrap();
    let raster = Raster::filled(128, 64, 0);
    let palette = Palette::new(vec![[0; 4]; 16]);
    assert!(matches!(
        encode(&template, &raster, &palette),
        Err(TextureError::PaletteSizeMismatch {
            expected: 256,
            actual: 16
        })
    ));
}

#[test]
fn test_index_out_of_range() {
    let template = ContainerProfile::qtx().blank(32, 16, BitDepth::Four).unwrap();
    let mut indices = vec![0u8; 32 * 16];
    indices[40] = 16;
    let raster = Raster::new(32, 16, indices).unwrap();
    let palette = Palette::new(vec![[0; 4]; 16]);
    assert!(matches!(
        encode(&template, &raster, &palette),
        Err(TextureError::IndexOutOfRange {
            pixel: 40,
            index: 16,
            colors: 16
        })
    ));
}

#[test]
fn test_unsupported_format() {
    let mut data = ContainerProfile::qtx().blank(128, 64, BitDepth::Four).unwrap();
    data[..4].copy_from_slice(b"ZQFM");
    assert!(matches!(decode(&data), Err(TextureError::UnsupportedFormat(_))));

    let mut data = ContainerProfile::qtx().blank(128, 64, BitDepth::Four).unwrap();
    data[0x40] = 0x00;
    assert!(matches!(decode(&data), Err(TextureError::UnsupportedFormat(_))));
}

#[test]
fn test_truncated_data() {
    let data = ContainerProfile::qtx().blank(128, 64, BitDepth::Eight).unwrap();
    let short = &data[..data.len() - 1];
    assert!(matches!(
        decode(short),
        Err(TextureError::TruncatedData { needed, actual })
            if needed == data.len() && actual == short.len()
    ));
}

#[test]
fn test_unsupported_dimensions() {
    let data = ContainerProfile::qtx().blank(128, 96, BitDepth::Four).unwrap();
    assert!(matches!(
        decode(&data),
        Err(TextureError::UnsupportedDimensions {
            width: 128,
            height: 96
        })
    ));

    let data = ContainerProfile::qtx().blank(192, 64, BitDepth::Eight).unwrap();
    assert!(matches!(
        decode(&data),
        Err(TextureError::UnsupportedDimensions { width: 192, .. })
    ));
}

#[test]
fn test_failed_encode_leaves_template() {
    let template = noisy_template(&ContainerProfile::qtx(), 128, 64, BitDepth::Four, 16, 3);
    let original = template.clone();
    let raster = Raster::filled(128, 64, 200);
    let palette = Palette::new(vec![[0; 4]; 16]);
    assert!(encode(&template, &raster, &palette).is_err());
    assert_eq!(template, original);
}

#[test]
fn test_profile_persistence() {
    for profile in ContainerProfile::builtin() {
        let bytes = profile.to_bytes().unwrap();
        assert_eq!(ContainerProfile::from_bytes(&bytes).unwrap(), profile);
    }
    assert!(matches!(
        ContainerProfile::from_bytes(&[0xFF; 3]),
        Err(TextureError::InvalidProfile(_))
    ));
}

#[test]
fn test_loaded_profile_decodes() {
    let bytes = ContainerProfile::qtx_font().to_bytes().unwrap();
    let profile = ContainerProfile::from_bytes(&bytes).unwrap();
    assert_round_trip(&profile, 256, 256, BitDepth::Four, 11);
}

#[test]
fn test_probe_then_decode() {
    let profile = ContainerProfile::gs();
    let template = noisy_template(&profile, 64, 64, BitDepth::Eight, 0, 5);
    let (found, header) = probe(&template).unwrap();
    assert_eq!(found.name, "gs");
    assert_eq!(header.depth, BitDepth::Eight);
    assert_eq!(header.container_len(), template.len());
    assert_eq!(decode_with(&found, &template).unwrap().raster.dimensions(), (64, 64));
}

#[test]
fn test_palette_from_indexed_image() {
    let template = ContainerProfile::qtx().blank(128, 64, BitDepth::Four).unwrap();
    let rgb = [[255, 0, 0], [0, 255, 0], [0, 0, 255]];
    let palette = Palette::from_rgb(BitDepth::Four, &rgb, Some(&Transparency::Single(0))).unwrap();
    let raster = Raster::from_fn(128, 64, |x, _| (x % 3) as u8);

    let texture = decode(&encode(&template, &raster, &palette).unwrap()).unwrap();
    assert_eq!(texture.palette.colors[0], [255, 0, 0, 0]);
    assert_eq!(texture.palette.colors[2], [0, 0, 255, 255]);
    assert_eq!(texture.palette.colors[3], [0, 0, 0, 255]);
    assert_eq!(texture.raster, raster);
}

#[test]
fn test_parallel_decode() {
    let profile = ContainerProfile::qtx();
    let containers: Vec<Vec<u8>> = (0..8u32)
        .map(|seed| {
            let mut noise = Noise::new(seed);
            let template = profile.blank(256, 128, BitDepth::Four).unwrap();
            let indices = noise.bytes(256 * 128).iter().map(|b| b & 0x0F).collect();
            let raster = Raster::new(256, 128, indices).unwrap();
            let palette = random_palette(BitDepth::Four, AlphaConvention::HalfScale, seed);
            encode(&template, &raster, &palette).unwrap()
        })
        .collect();

    let decoded: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = containers
            .iter()
            .map(|data| scope.spawn(move || decode(data)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect()
    });
    for (data, texture) in containers.iter().zip(&decoded) {
        assert_eq!(&decode(data).unwrap(), texture);
    }
}
