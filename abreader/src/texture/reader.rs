//! Texture2D record reader
//!
//! Reads the fixed Texture2D layout from a cursor positioned at the start of
//! the object. Only the pixel format, dimensions and the pixel location are
//! needed downstream; everything else is captured as read.

use super::formats::PixelFormat;
use super::types::{PixelSource, StreamingRef, TextureRecord, TextureSettings};
use crate::error::{BinaryError, Result};
use crate::reader::ByteCursor;
use abreader_core::LookupTables;
use tracing::trace;

/// Texture2D reader
pub struct TextureReader<'t> {
    tables: &'t LookupTables,
}

impl<'t> TextureReader<'t> {
    /// Create a reader that resolves formats through `tables`
    pub fn new(tables: &'t LookupTables) -> Self {
        Self { tables }
    }

    /// Read a Texture2D record
    pub fn read(&self, cursor: &mut ByteCursor) -> Result<TextureRecord> {
        let name = cursor.read_aligned_string()?;

        let forced_fallback_format = cursor.read_i32()?;
        let downscale_fallback = cursor.read_bool()?;
        let is_alpha_channel_optional = cursor.read_bool()?;
        cursor.align();

        let width = read_dimension(cursor, "width")?;
        let height = read_dimension(cursor, "height")?;
        let complete_image_size = cursor.read_i32()?;
        let mips_stripped = cursor.read_i32()?;
        let format_code = cursor.read_i32()?;
        let format = PixelFormat::from_code(format_code, self.tables)?;
        let mip_count = cursor.read_i32()?;
        trace!(%name, width, height, %format, "texture header");

        let is_readable = cursor.read_bool()?;
        let is_pre_processed = cursor.read_bool()?;
        let ignore_master_texture_limit = cursor.read_bool()?;
        let streaming_mipmaps = cursor.read_bool()?;
        cursor.align();
        let streaming_mipmaps_priority = cursor.read_i32()?;
        let image_count = cursor.read_i32()?;
        let texture_dimension = cursor.read_i32()?;

        let texture_settings = TextureSettings {
            filter_mode: cursor.read_i32()?,
            aniso: cursor.read_i32()?,
            mip_bias: cursor.read_f32()?,
            wrap_u: cursor.read_i32()?,
            wrap_v: cursor.read_i32()?,
            wrap_w: cursor.read_i32()?,
        };

        let lightmap_format = cursor.read_i32()?;
        let color_space = cursor.read_i32()?;
        let platform_blob = cursor.read_byte_array("platform blob size")?;
        cursor.align();

        let image_data = cursor.read_byte_array("image data size")?;
        cursor.align();
        let stream = read_streaming_ref(cursor)?;

        let pixels = if image_data.is_empty() {
            PixelSource::Streamed(stream)
        } else {
            PixelSource::Inline(image_data)
        };

        Ok(TextureRecord {
            name,
            forced_fallback_format,
            downscale_fallback,
            is_alpha_channel_optional,
            width,
            height,
            complete_image_size,
            mips_stripped,
            format_code,
            format,
            mip_count,
            is_readable,
            is_pre_processed,
            ignore_master_texture_limit,
            streaming_mipmaps,
            streaming_mipmaps_priority,
            image_count,
            texture_dimension,
            texture_settings,
            lightmap_format,
            color_space,
            platform_blob,
            pixels,
        })
    }
}

fn read_dimension(cursor: &mut ByteCursor, field: &str) -> Result<u32> {
    let offset = cursor.position();
    let value = cursor.read_i32()?;
    u32::try_from(value)
        .map_err(|_| BinaryError::invalid_format(field, offset, format!("negative value {}", value)))
}

/// Read a streaming reference (offset, size, aligned path)
pub fn read_streaming_ref(cursor: &mut ByteCursor) -> Result<StreamingRef> {
    Ok(StreamingRef {
        offset: cursor.read_u64()?,
        size: cursor.read_u32()?,
        path: cursor.read_aligned_string()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::reader::ByteOrder;

    fn aligned_string(out: &mut Vec<u8>, text: &str) {
        out.extend_from_slice(&(text.len() as i32).to_le_bytes());
        out.extend_from_slice(text.as_bytes());
        while out.len() % 4 != 0 {
            out.push(0);
        }
    }

    fn texture_bytes(format: i32, inline: &[u8], path: &str) -> Vec<u8> {
        let mut out = Vec::new();
        aligned_string(&mut out, "tex");
        out.extend_from_slice(&(-1i32).to_le_bytes());
        out.extend_from_slice(&[0, 1, 0, 0]);
        for value in [2i32, 2, 16, 0, format, 1] {
            out.extend_from_slice(&value.to_le_bytes());
        }
        out.extend_from_slice(&[1, 0, 0, 0]);
        for value in [0i32, 1, 2] {
            out.extend_from_slice(&value.to_le_bytes());
        }
        for value in [1i32, 1] {
            out.extend_from_slice(&value.to_le_bytes());
        }
        out.extend_from_slice(&0.5f32.to_le_bytes());
        for value in [1i32, 1, 0, 6, 1, 0] {
            out.extend_from_slice(&value.to_le_bytes());
        }
        out.extend_from_slice(&(inline.len() as i32).to_le_bytes());
        out.extend_from_slice(inline);
        while out.len() % 4 != 0 {
            out.push(0);
        }
        out.extend_from_slice(&32u64.to_le_bytes());
        out.extend_from_slice(&16u32.to_le_bytes());
        aligned_string(&mut out, path);
        out
    }

    #[test]
    fn test_streamed_texture() {
        let data = texture_bytes(4, &[], "archive:/CAB-x/CAB-x.resS");
        let tables = LookupTables::builtin();
        let mut cursor = ByteCursor::new(&data, ByteOrder::Little);
        let texture = TextureReader::new(&tables).read(&mut cursor).unwrap();

        assert_eq!(texture.name, "tex");
        assert_eq!(texture.dimensions(), (2, 2));
        assert_eq!(texture.format, PixelFormat::RGBA32);
        assert!(texture.is_readable);
        assert!(texture.is_alpha_channel_optional);
        assert_eq!(texture.texture_settings.mip_bias, 0.5);
        assert_eq!(texture.color_space, 1);
        let stream = texture.streaming_ref().unwrap();
        assert_eq!((stream.offset, stream.size), (32, 16));
        assert_eq!(stream.path, "archive:/CAB-x/CAB-x.resS");
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_inline_texture() {
        let pixels = [7u8; 16];
        let data = texture_bytes(4, &pixels, "");
        let tables = LookupTables::builtin();
        let mut cursor = ByteCursor::new(&data, ByteOrder::Little);
        let texture = TextureReader::new(&tables).read(&mut cursor).unwrap();
        assert_eq!(texture.pixels, PixelSource::Inline(pixels.to_vec()));
    }

    #[test]
    fn test_unsupported_format_reported() {
        let data = texture_bytes(3, &[], "");
        let tables = LookupTables::builtin();
        let mut cursor = ByteCursor::new(&data, ByteOrder::Little);
        let err = TextureReader::new(&tables).read(&mut cursor).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
        assert!(err.to_string().contains("RGB24"));
    }
}
