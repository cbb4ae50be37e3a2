//! ETC2 RGBA8 decompressor
//!
//! Each 16-byte block holds an 8-byte EAC alpha plane followed by an 8-byte
//! ETC2 color block. Blocks cover 4x4 pixels in row-major block order.
//! Decoded pixels are packed as `0xAARRGGBB`, so their little-endian bytes
//! read B, G, R, A.
//!
//! H mode bumps the distance index when the first base color is greater than
//! or equal to the second as a 24-bit RGB value. The `>=` is the standard
//! ordering and matches texture2ddecoder.

use super::Decoder;
use crate::error::{BinaryError, Result};
use crate::texture::formats::PixelFormat;

/// Bytes per ETC2 RGBA8 block
pub const BLOCK_SIZE: usize = 16;

/// Pixel index for the n-th decoded texel (column-major within the block)
const WRITE_ORDER: [usize; 16] = [0, 4, 8, 12, 1, 5, 9, 13, 2, 6, 10, 14, 3, 7, 11, 15];
const WRITE_ORDER_REV: [usize; 16] = [15, 11, 7, 3, 14, 10, 6, 2, 13, 9, 5, 1, 12, 8, 4, 0];

const DISTANCE_TABLE: [i32; 8] = [3, 6, 11, 16, 23, 32, 41, 64];

const ETC1_SUBBLOCK_TABLE: [[usize; 16]; 2] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1],
    [0, 0, 1, 1, 0, 0, 1, 1, 0, 0, 1, 1, 0, 0, 1, 1],
];

const ETC1_MODIFIER_TABLE: [[i32; 2]; 8] = [
    [2, 8],
    [5, 17],
    [9, 29],
    [13, 42],
    [18, 60],
    [24, 80],
    [33, 106],
    [47, 183],
];

const ETC2_ALPHA_MOD_TABLE: [[i32; 8]; 16] = [
    [-3, -6, -9, -15, 2, 5, 8, 14],
    [-3, -7, -10, -13, 2, 6, 9, 12],
    [-2, -5, -8, -13, 1, 4, 7, 12],
    [-2, -4, -6, -13, 1, 3, 5, 12],
    [-3, -6, -8, -12, 2, 5, 7, 11],
    [-3, -7, -9, -11, 2, 6, 8, 10],
    [-4, -7, -8, -11, 3, 6, 7, 10],
    [-3, -5, -8, -11, 2, 4, 7, 10],
    [-2, -6, -8, -10, 1, 5, 7, 9],
    [-2, -5, -8, -10, 1, 4, 7, 9],
    [-2, -4, -8, -10, 1, 3, 7, 9],
    [-2, -5, -7, -10, 1, 4, 6, 9],
    [-3, -4, -7, -10, 2, 3, 6, 9],
    [-1, -2, -3, -10, 0, 1, 2, 9],
    [-4, -6, -8, -9, 3, 5, 7, 8],
    [-3, -5, -7, -9, 2, 4, 6, 8],
];

/// Color sub-mode of an ETC2 block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Individual,
    Differential,
    T,
    H,
    Planar,
}

#[inline]
fn clamp(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

#[inline]
fn argb(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

#[inline]
fn color_raw(c: [u8; 3]) -> u32 {
    argb(c[0], c[1], c[2], 255)
}

#[inline]
fn color_offset(c: [u8; 3], m: i32) -> u32 {
    argb(
        clamp(c[0] as i32 + m),
        clamp(c[1] as i32 + m),
        clamp(c[2] as i32 + m),
        255,
    )
}

/// Base color and signed delta of one channel in differential layout
#[inline]
fn differential(byte: u8) -> (i32, i32) {
    let base = (byte & 0xF8) as i32;
    let delta = (byte << 3 & 0x18) as i32 - (byte << 3 & 0x20) as i32;
    (base, delta)
}

#[inline]
fn overflows(base: i32, delta: i32) -> bool {
    !(0..=255).contains(&(base + delta))
}

/// Select the color sub-mode of an 8-byte color block
pub fn color_mode(data: &[u8]) -> ColorMode {
    if data[3] & 2 == 0 {
        return ColorMode::Individual;
    }
    let (r, dr) = differential(data[0]);
    let (g, dg) = differential(data[1]);
    let (b, db) = differential(data[2]);
    if overflows(r, dr) {
        ColorMode::T
    } else if overflows(g, dg) {
        ColorMode::H
    } else if overflows(b, db) {
        ColorMode::Planar
    } else {
        ColorMode::Differential
    }
}

/// Decode an 8-byte ETC2 color block into 16 opaque pixels
fn decode_color_block(data: &[u8], out: &mut [u32; 16]) {
    let mut j = (data[6] as u32) << 8 | data[7] as u32;
    let mut k = (data[4] as u32) << 8 | data[5] as u32;

    match color_mode(data) {
        ColorMode::T => {
            let c0 = [
                (data[0] << 3 & 0xC0) | (data[0] << 4 & 0x30) | (data[0] >> 1 & 0x0C) | (data[0] & 3),
                (data[1] & 0xF0) | data[1] >> 4,
                (data[1] & 0x0F) | data[1] << 4,
            ];
            let c1 = [
                (data[2] & 0xF0) | data[2] >> 4,
                (data[2] & 0x0F) | data[2] << 4,
                (data[3] & 0xF0) | data[3] >> 4,
            ];
            let d = DISTANCE_TABLE[((data[3] >> 1 & 6) | (data[3] & 1)) as usize];
            let color_set = [
                color_raw(c0),
                color_offset(c1, d),
                color_raw(c1),
                color_offset(c1, -d),
            ];
            write_paletted(&color_set, j, k, out);
        }
        ColorMode::H => {
            let mut c0 = [
                (data[0] << 1 & 0xF0) | (data[0] >> 3 & 0x0F),
                (data[0] << 5 & 0xE0) | (data[1] & 0x10),
                (data[1] & 8) | (data[1] << 1 & 6) | data[2] >> 7,
            ];
            c0[1] |= c0[1] >> 4;
            c0[2] |= c0[2] << 4;
            let mut c1 = [
                (data[2] << 1 & 0xF0) | (data[2] >> 3 & 0x0F),
                (data[2] << 5 & 0xE0) | (data[3] >> 3 & 0x10),
                (data[3] << 1 & 0xF0) | (data[3] >> 3 & 0x0F),
            ];
            c1[1] |= c1[1] >> 4;

            let mut index = ((data[3] & 4) | (data[3] << 1 & 2)) as usize;
            if c0 >= c1 {
                index += 1;
            }
            let d = DISTANCE_TABLE[index];
            let color_set = [
                color_offset(c0, d),
                color_offset(c0, -d),
                color_offset(c1, d),
                color_offset(c1, -d),
            ];
            write_paletted(&color_set, j, k, out);
        }
        ColorMode::Planar => {
            let mut c0 = [
                (data[0] << 1 & 0xFC) | (data[0] >> 5 & 3),
                (data[0] << 7 & 0x80) | (data[1] & 0x7E) | (data[0] & 1),
                (data[1] << 7 & 0x80)
                    | (data[2] << 2 & 0x60)
                    | (data[2] << 3 & 0x18)
                    | (data[3] >> 5 & 4),
            ];
            c0[2] |= c0[2] >> 6;
            let mut c1 = [
                (data[3] << 1 & 0xF8) | (data[3] << 2 & 4) | (data[3] >> 5 & 3),
                (data[4] & 0xFE) | data[4] >> 7,
                (data[4] << 7 & 0x80) | (data[5] >> 1 & 0x7C),
            ];
            c1[2] |= c1[2] >> 6;
            let c2 = [
                (data[5] << 5 & 0xE0) | (data[6] >> 3 & 0x1C) | (data[5] >> 1 & 3),
                (data[6] << 3 & 0xF8) | (data[7] >> 5 & 6) | (data[6] >> 4 & 1),
                data[7] << 2 | (data[7] >> 4 & 3),
            ];

            let plane = |ch: usize, x: i32, y: i32| -> u8 {
                let (o, h, v) = (c0[ch] as i32, c1[ch] as i32, c2[ch] as i32);
                clamp((x * (h - o) + y * (v - o) + 4 * o + 2) >> 2)
            };
            for y in 0..4 {
                for x in 0..4 {
                    out[(y * 4 + x) as usize] =
                        argb(plane(0, x, y), plane(1, x, y), plane(2, x, y), 255);
                }
            }
        }
        mode => {
            let colors = if mode == ColorMode::Differential {
                let (r, dr) = differential(data[0]);
                let (g, dg) = differential(data[1]);
                let (b, db) = differential(data[2]);
                let expand = |v: i32| -> u8 {
                    let v = v as u8;
                    v | v >> 5
                };
                [
                    [expand(r), expand(g), expand(b)],
                    [expand(r + dr), expand(g + dg), expand(b + db)],
                ]
            } else {
                [
                    [
                        (data[0] & 0xF0) | data[0] >> 4,
                        (data[1] & 0xF0) | data[1] >> 4,
                        (data[2] & 0xF0) | data[2] >> 4,
                    ],
                    [
                        (data[0] & 0x0F) | data[0] << 4,
                        (data[1] & 0x0F) | data[1] << 4,
                        (data[2] & 0x0F) | data[2] << 4,
                    ],
                ]
            };

            let codes = [
                ETC1_MODIFIER_TABLE[(data[3] >> 5) as usize],
                ETC1_MODIFIER_TABLE[(data[3] >> 2 & 7) as usize],
            ];
            let table = &ETC1_SUBBLOCK_TABLE[(data[3] & 1) as usize];
            for (i, &s) in table.iter().enumerate() {
                let m = codes[s][(j & 1) as usize];
                let m = if k & 1 != 0 { -m } else { m };
                out[WRITE_ORDER[i]] = color_offset(colors[s], m);
                j >>= 1;
                k >>= 1;
            }
        }
    }
}

/// Write T/H mode pixels from a four-entry palette
fn write_paletted(color_set: &[u32; 4], mut j: u32, mut k: u32, out: &mut [u32; 16]) {
    k <<= 1;
    for &index in WRITE_ORDER.iter() {
        out[index] = color_set[((k & 2) | (j & 1)) as usize];
        j >>= 1;
        k >>= 1;
    }
}

/// Apply an 8-byte EAC alpha plane to 16 decoded pixels
fn decode_alpha_block(data: &[u8], out: &mut [u32; 16]) {
    let base = data[0] as i32;
    if data[1] & 0xF0 == 0 {
        for pixel in out.iter_mut() {
            *pixel = (*pixel & 0x00FF_FFFF) | (base as u32) << 24;
        }
        return;
    }

    let multiplier = (data[1] >> 4) as i32;
    let table = &ETC2_ALPHA_MOD_TABLE[(data[1] & 0x0F) as usize];
    let mut bits = data[..8].iter().fold(0u64, |acc, &b| acc << 8 | b as u64);
    for &index in WRITE_ORDER_REV.iter() {
        let alpha = clamp(base + multiplier * table[(bits & 7) as usize]);
        out[index] = (out[index] & 0x00FF_FFFF) | (alpha as u32) << 24;
        bits >>= 3;
    }
}

/// Decode one 16-byte block into 16 pixels in raster order
pub fn decode_block(block: &[u8; BLOCK_SIZE]) -> [u32; 16] {
    let mut out = [0u32; 16];
    decode_color_block(&block[8..], &mut out);
    decode_alpha_block(&block[..8], &mut out);
    out
}

/// Decode ETC2 RGBA8 data into packed `0xAARRGGBB` pixels
pub fn decode_etc2_rgba8(data: &[u8], width: u32, height: u32) -> Result<Vec<u32>> {
    if width == 0 || height == 0 {
        return Err(BinaryError::invalid_format(
            "texture dimensions",
            0,
            format!("{}x{}", width, height),
        ));
    }

    let (w, h) = (width as usize, height as usize);
    let blocks_x = w.div_ceil(4);
    let blocks_y = h.div_ceil(4);
    let needed = blocks_x * blocks_y * BLOCK_SIZE;
    if data.len() < needed {
        return Err(BinaryError::not_enough_data(needed, data.len(), 0));
    }

    let mut image = vec![0u32; w * h];
    let mut blocks = data.chunks_exact(BLOCK_SIZE);
    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let Some(block) = blocks.next().and_then(|b| <&[u8; BLOCK_SIZE]>::try_from(b).ok())
            else {
                return Err(BinaryError::not_enough_data(needed, data.len(), 0));
            };
            let pixels = decode_block(block);
            copy_block(&mut image, w, h, bx * 4, by * 4, &pixels);
        }
    }
    Ok(image)
}

/// Copy a 4x4 block into the image, clipping at the right and bottom edges
fn copy_block(image: &mut [u32], width: usize, height: usize, x: usize, y: usize, pixels: &[u32; 16]) {
    let cols = (width - x).min(4);
    for row in 0..4.min(height - y) {
        let dst = (y + row) * width + x;
        image[dst..dst + cols].copy_from_slice(&pixels[row * 4..row * 4 + cols]);
    }
}

/// Decode ETC2 RGBA8 data into RGBA bytes
pub fn decode_etc2_rgba8_bytes(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let pixels = decode_etc2_rgba8(data, width, height)?;
    let mut out = Vec::with_capacity(pixels.len() * 4);
    for pixel in pixels {
        let [b, g, r, a] = pixel.to_le_bytes();
        out.extend_from_slice(&[r, g, b, a]);
    }
    Ok(out)
}

/// Decoder for ETC2_RGBA8 payloads
pub struct Etc2Decoder;

impl Etc2Decoder {
    /// Create a new ETC2 decoder
    pub fn new() -> Self {
        Self
    }
}

impl Default for Etc2Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for Etc2Decoder {
    fn format(&self) -> PixelFormat {
        PixelFormat::ETC2_RGBA8
    }

    fn decode(&self, data: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
        if data.len() % BLOCK_SIZE != 0 {
            return Err(BinaryError::invalid_format(
                "ETC2 payload",
                0,
                format!("{} bytes is not a whole number of blocks", data.len()),
            ));
        }
        decode_etc2_rgba8_bytes(data, width, height)
    }
}
