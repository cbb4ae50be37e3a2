//! Uncompressed texture decoders

use super::Decoder;
use crate::error::{BinaryError, Result};
use crate::texture::formats::PixelFormat;

/// Decoder for RGBA32 (R8G8B8A8) payloads
pub struct Rgba32Decoder {
    strict: bool,
}

impl Rgba32Decoder {
    /// Create a decoder
    ///
    /// A strict decoder requires the payload to be exactly one mip level; a
    /// lenient one drops trailing bytes.
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }
}

impl Decoder for Rgba32Decoder {
    fn format(&self) -> PixelFormat {
        PixelFormat::RGBA32
    }

    fn decode(&self, data: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
        let expected = PixelFormat::RGBA32.data_size(width, height);
        if data.len() < expected {
            return Err(BinaryError::not_enough_data(expected, data.len(), 0));
        }
        if self.strict && data.len() != expected {
            return Err(BinaryError::invalid_format(
                "RGBA32 payload",
                0,
                format!("expected {} bytes, got {}", expected, data.len()),
            ));
        }

        // Already in the output layout
        Ok(data[..expected].to_vec())
    }
}
