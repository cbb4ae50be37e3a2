//! ETC2 RGBA8 textures decoded end to end

mod common;

use abreader::texture::{decode_etc2_rgba8_bytes, Decoder, Etc2Decoder};
use abreader::{decode_etc2_rgba8, BundleSession, DecodeOptions, DecodedObject, ErrorKind, PixelFormat};
use common::*;
use proptest::prelude::*;

/// Individual mode, base colors 0x88, codeword table 0, alpha 128
const GRAY_BLOCK: [u8; 16] = [
    0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x88, 0x88, 0x88, 0x00, 0x00, 0x00, 0x00, 0x00,
];

#[test]
fn test_gray_block() {
    let pixels = decode_etc2_rgba8(&GRAY_BLOCK, 4, 4).unwrap();
    assert_eq!(pixels.len(), 16);
    for pixel in pixels {
        let [b, g, r, a] = pixel.to_le_bytes();
        assert_eq!((r, g, b, a), (0x8A, 0x8A, 0x8A, 128));
    }
}

#[test]
fn test_etc2_texture_in_bundle() {
    // 8x4 texture: two gray blocks side by side
    let mut blocks = GRAY_BLOCK.to_vec();
    blocks.extend_from_slice(&GRAY_BLOCK);
    let texture = texture_payload("gray", 8, 4, 47, Pixels::Inline(&blocks));
    let file = SerializedFileBuilder::new().object(1, TEXTURE_2D, texture).build();
    let data = BundleBuilder::new().node("CAB-etc", file).build();
    let session = BundleSession::from_bytes(&data, DecodeOptions::default()).unwrap();

    let texture = match session.decode_all().remove(0).result.unwrap() {
        Some(DecodedObject::Texture(texture)) => texture,
        other => panic!("expected a texture, got {:?}", other),
    };
    assert_eq!(texture.format, PixelFormat::ETC2_RGBA8);

    let buffer = session.decode_texture_pixels(&texture).unwrap();
    assert_eq!((buffer.width, buffer.height), (8, 4));
    assert!(buffer.pixels().all(|p| p == [0x8A, 0x8A, 0x8A, 128]));

    let image = buffer.into_rgba_image().unwrap();
    assert_eq!(image.get_pixel(7, 3).0, [0x8A, 0x8A, 0x8A, 128]);
}

#[test]
fn test_partial_block_payload() {
    let err = Etc2Decoder::new().decode(&GRAY_BLOCK[..12], 4, 4).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);

    let err = decode_etc2_rgba8(&GRAY_BLOCK, 8, 8).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Truncation);
}

proptest! {
    #[test]
    fn prop_decode_is_deterministic(
        data in proptest::collection::vec(any::<u8>(), 16 * 4),
        width in 1u32..=8,
        height in 1u32..=8,
    ) {
        let first = decode_etc2_rgba8_bytes(&data, width, height).unwrap();
        let second = decode_etc2_rgba8_bytes(&data, width, height).unwrap();
        prop_assert_eq!(first.len(), (width * height * 4) as usize);
        prop_assert_eq!(first, second);
    }
}
