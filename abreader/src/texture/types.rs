//! Texture data structures

use super::formats::PixelFormat;
use crate::error::{BinaryError, Result};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Reference to pixel data stored in a resource blob
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingRef {
    pub offset: u64,
    pub size: u32,
    pub path: String,
}

impl StreamingRef {
    /// Byte range inside the blob, if it does not overflow
    pub fn range(&self) -> Option<std::ops::Range<usize>> {
        let start = usize::try_from(self.offset).ok()?;
        let end = start.checked_add(self.size as usize)?;
        Some(start..end)
    }
}

/// GL texture settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextureSettings {
    pub filter_mode: i32,
    pub aniso: i32,
    pub mip_bias: f32,
    pub wrap_u: i32,
    pub wrap_v: i32,
    pub wrap_w: i32,
}

/// Where a texture's pixels live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelSource {
    /// Pixel bytes stored in the object itself
    Inline(Vec<u8>),
    /// Pixel bytes stored in a resource blob
    Streamed(StreamingRef),
}

/// Texture2D object record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureRecord {
    pub name: String,
    pub forced_fallback_format: i32,
    pub downscale_fallback: bool,
    pub is_alpha_channel_optional: bool,
    pub width: u32,
    pub height: u32,
    pub complete_image_size: i32,
    pub mips_stripped: i32,
    /// Raw format code as stored
    pub format_code: i32,
    pub format: PixelFormat,
    pub mip_count: i32,
    pub is_readable: bool,
    pub is_pre_processed: bool,
    pub ignore_master_texture_limit: bool,
    pub streaming_mipmaps: bool,
    pub streaming_mipmaps_priority: i32,
    pub image_count: i32,
    pub texture_dimension: i32,
    pub texture_settings: TextureSettings,
    pub lightmap_format: i32,
    pub color_space: i32,
    pub platform_blob: Vec<u8>,
    pub pixels: PixelSource,
}

impl TextureRecord {
    /// Texture dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Streaming reference, if the pixels are not inline
    pub fn streaming_ref(&self) -> Option<&StreamingRef> {
        match &self.pixels {
            PixelSource::Streamed(stream) => Some(stream),
            PixelSource::Inline(_) => None,
        }
    }

    /// Check if the pixels live in a resource blob
    pub fn is_streamed(&self) -> bool {
        self.streaming_ref().is_some()
    }

    /// Size of the top mip level for this format
    pub fn expected_data_size(&self) -> usize {
        self.format.data_size(self.width, self.height)
    }
}

/// Decoded RGBA8 pixels in source row order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap RGBA8 bytes, checking the length
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(BinaryError::invalid_format(
                "pixel buffer",
                0,
                format!("expected {} bytes, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// RGBA of one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y as usize * self.width as usize + x as usize) * 4;
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&self.data[start..start + 4]);
        Some(rgba)
    }

    /// Iterate over pixels in row order
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data.chunks_exact(4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Reverse the row order
    ///
    /// Textures are stored bottom row first; exporters usually want top first.
    pub fn flip_vertical(&mut self) {
        let row = self.width as usize * 4;
        if row == 0 {
            return;
        }
        let rows = self.height as usize;
        for y in 0..rows / 2 {
            let (top, bottom) = self.data.split_at_mut((rows - 1 - y) * row);
            top[y * row..(y + 1) * row].swap_with_slice(&mut bottom[..row]);
        }
    }

    /// Convert into an `image` buffer for export
    pub fn into_rgba_image(self) -> Result<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data).ok_or_else(|| {
            BinaryError::invalid_format("pixel buffer", 0, "size does not match dimensions")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_rows() -> PixelBuffer {
        PixelBuffer::new(1, 2, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap()
    }

    #[test]
    fn test_pixel_access() {
        let buffer = two_rows();
        assert_eq!(buffer.pixel(0, 1), Some([5, 6, 7, 8]));
        assert_eq!(buffer.pixel(1, 0), None);
        assert_eq!(buffer.pixels().count(), 2);
    }

    #[test]
    fn test_flip_vertical() {
        let mut buffer = two_rows();
        buffer.flip_vertical();
        assert_eq!(buffer.data, vec![5, 6, 7, 8, 1, 2, 3, 4]);

        let mut odd = PixelBuffer::new(1, 3, (0..12).collect()).unwrap();
        odd.flip_vertical();
        assert_eq!(odd.data, vec![8, 9, 10, 11, 4, 5, 6, 7, 0, 1, 2, 3]);
    }

    #[test]
    fn test_length_checked() {
        assert!(PixelBuffer::new(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn test_into_rgba_image() {
        let image = two_rows().into_rgba_image().unwrap();
        assert_eq!(image.get_pixel(0, 1).0, [5, 6, 7, 8]);
    }

    #[test]
    fn test_streaming_range() {
        let stream = StreamingRef {
            offset: 8,
            size: 4,
            path: String::new(),
        };
        assert_eq!(stream.range(), Some(8..12));
    }
}
