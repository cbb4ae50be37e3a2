//! Texture decoders
//!
//! Turns a [`TextureRecord`] into an RGBA8 [`PixelBuffer`]: the payload is
//! located (inline or in a resource blob), then handed to the decoder for
//! its pixel format.

mod basic;
pub mod etc2;

pub use basic::Rgba32Decoder;
pub use etc2::{Etc2Decoder, decode_etc2_rgba8, decode_etc2_rgba8_bytes};

use super::formats::PixelFormat;
use super::types::{PixelBuffer, PixelSource, TextureRecord};
use crate::bundle::ResourceBlobs;
use crate::error::{BinaryError, Result};
use crate::options::DecodeOptions;
use tracing::trace;

/// Common decoder trait
pub trait Decoder {
    /// Format handled by this decoder
    fn format(&self) -> PixelFormat;

    /// Decode a payload into RGBA8 bytes in source row order
    fn decode(&self, data: &[u8], width: u32, height: u32) -> Result<Vec<u8>>;
}

/// Pick the decoder for a format
pub fn decoder_for(format: PixelFormat, options: &DecodeOptions) -> Box<dyn Decoder> {
    match format {
        PixelFormat::RGBA32 => Box::new(Rgba32Decoder::new(options.strict_rgba32_size)),
        PixelFormat::ETC2_RGBA8 => Box::new(Etc2Decoder::new()),
    }
}

/// Locate a texture's payload bytes
pub fn resolve_payload<'a>(
    texture: &'a TextureRecord,
    resources: &'a ResourceBlobs,
) -> Result<&'a [u8]> {
    match &texture.pixels {
        PixelSource::Inline(data) => Ok(data),
        PixelSource::Streamed(stream) => {
            let blob = resources.get(&stream.path).ok_or_else(|| {
                BinaryError::not_enough_data(stream.size as usize, 0, stream.offset)
            })?;
            stream
                .range()
                .and_then(|range| blob.get(range))
                .ok_or_else(|| {
                    BinaryError::not_enough_data(
                        (stream.offset as usize).saturating_add(stream.size as usize),
                        blob.len(),
                        stream.offset,
                    )
                })
        }
    }
}

/// Check dimensions before allocating
pub fn validate_dimensions(width: u32, height: u32, max: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(BinaryError::invalid_format(
            "texture dimensions",
            0,
            format!("{}x{}", width, height),
        ));
    }
    if width > max || height > max {
        return Err(BinaryError::invalid_format(
            "texture dimensions",
            0,
            format!("{}x{} exceeds the {} limit", width, height, max),
        ));
    }
    Ok(())
}

/// Decode a texture's top mip level to RGBA8
pub fn decode_texture(
    texture: &TextureRecord,
    resources: &ResourceBlobs,
    options: &DecodeOptions,
) -> Result<PixelBuffer> {
    validate_dimensions(texture.width, texture.height, options.max_texture_dimension)?;
    let payload = resolve_payload(texture, resources)?;
    trace!(
        name = %texture.name,
        format = %texture.format,
        payload = payload.len(),
        "decoding texture"
    );

    let data = decoder_for(texture.format, options).decode(payload, texture.width, texture.height)?;
    PixelBuffer::new(texture.width, texture.height, data)
}
