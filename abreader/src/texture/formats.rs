//! Texture pixel formats
//!
//! Format codes are mapped to names through the injected format table and
//! the names to a closed set of decodable formats. Anything outside that set
//! is an error, never a fallback.

use crate::error::{BinaryError, Result};
use abreader_core::LookupTables;
use serde::{Deserialize, Serialize};

/// Pixel formats the decoder can turn into RGBA8
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    RGBA32,
    ETC2_RGBA8,
}

impl PixelFormat {
    /// Symbolic name as it appears in the format table
    pub fn name(&self) -> &'static str {
        match self {
            PixelFormat::RGBA32 => "RGBA32",
            PixelFormat::ETC2_RGBA8 => "ETC2_RGBA8",
        }
    }

    /// Look up a format by its symbolic name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "RGBA32" => Some(PixelFormat::RGBA32),
            "ETC2_RGBA8" => Some(PixelFormat::ETC2_RGBA8),
            _ => None,
        }
    }

    /// Resolve a numeric format code through the format table
    pub fn from_code(code: i32, tables: &LookupTables) -> Result<Self> {
        match tables.texture_format_name(code) {
            Some(name) => Self::from_name(name).ok_or_else(|| {
                BinaryError::unsupported(format!("texture format {} ({})", name, code))
            }),
            None => Err(BinaryError::unsupported(format!(
                "unknown texture format code {}",
                code
            ))),
        }
    }

    /// Whether the format is block compressed
    pub fn is_block_compressed(&self) -> bool {
        matches!(self, PixelFormat::ETC2_RGBA8)
    }

    /// Bytes in one 4x4 block, or one pixel for uncompressed formats
    pub fn unit_size(&self) -> usize {
        match self {
            PixelFormat::RGBA32 => 4,
            PixelFormat::ETC2_RGBA8 => 16,
        }
    }

    /// Payload size of the top mip level
    pub fn data_size(&self, width: u32, height: u32) -> usize {
        let (w, h) = (width as usize, height as usize);
        if self.is_block_compressed() {
            w.div_ceil(4) * h.div_ceil(4) * self.unit_size()
        } else {
            w * h * self.unit_size()
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
