//! Compression support for bundle block data

use crate::error::{BinaryError, Result};
use serde::{Deserialize, Serialize};

/// Compression kinds a bundle may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompressionType {
    /// No compression
    None = 0,
    /// LZMA compression (recognized, not implemented)
    Lzma = 1,
    /// LZ4 compression
    Lz4 = 2,
    /// LZ4HC (High Compression) compression
    Lz4Hc = 3,
    /// LZHAM compression (recognized, not implemented)
    Lzham = 4,
}

impl CompressionType {
    /// Create compression type from the low six bits of a flags word
    pub fn from_flags(flags: u32) -> Result<Self> {
        match flags & ArchiveFlags::COMPRESSION_TYPE_MASK {
            0 => Ok(CompressionType::None),
            1 => Ok(CompressionType::Lzma),
            2 => Ok(CompressionType::Lz4),
            3 => Ok(CompressionType::Lz4Hc),
            4 => Ok(CompressionType::Lzham),
            other => Err(BinaryError::invalid_format(
                "compression kind",
                0,
                format!("unknown compression type {}", other),
            )),
        }
    }

    /// Check if this compression type can be decoded
    pub fn is_supported(self) -> bool {
        matches!(
            self,
            CompressionType::None | CompressionType::Lz4 | CompressionType::Lz4Hc
        )
    }

    /// Fail with an unsupported-compression error unless this type can be decoded
    pub fn ensure_supported(self) -> Result<()> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(unsupported(self))
        }
    }

    /// Get the name of the compression type
    pub fn name(self) -> &'static str {
        match self {
            CompressionType::None => "None",
            CompressionType::Lzma => "LZMA",
            CompressionType::Lz4 => "LZ4",
            CompressionType::Lz4Hc => "LZ4HC",
            CompressionType::Lzham => "LZHAM",
        }
    }
}

/// Bit layout of the bundle header flags word
pub struct ArchiveFlags;

impl ArchiveFlags {
    /// Compression type mask
    pub const COMPRESSION_TYPE_MASK: u32 = 0x3F;
    /// Block table and directory stored together right after the header
    pub const BLOCKS_AND_DIRECTORY_INFO_COMBINED: u32 = 0x40;
    /// Block table stored at the end of the file
    pub const BLOCK_INFO_AT_END: u32 = 0x80;
    /// Old web plugin compatibility
    pub const OLD_WEB_PLUGIN_COMPATIBILITY: u32 = 0x100;
    /// Block data is padded to 16 bytes after the block table
    pub const BLOCK_INFO_NEEDS_PADDING_AT_START: u32 = 0x200;
}

/// Bit layout of a block descriptor's flags
pub struct BlockFlags;

impl BlockFlags {
    /// Compression type mask
    pub const COMPRESSION_TYPE_MASK: u16 = 0x3F;
    /// Block is streamed
    pub const STREAMED: u16 = 0x40;
}

fn unsupported(compression: CompressionType) -> BinaryError {
    BinaryError::unsupported_compression(format!(
        "{} compression is not supported",
        compression.name()
    ))
}

/// Decompress `data` to exactly `uncompressed_size` bytes
///
/// A result of any other length is an error; LZMA and LZHAM are reported
/// as unsupported without touching the payload.
pub fn decompress(
    data: &[u8],
    compression: CompressionType,
    uncompressed_size: usize,
) -> Result<Vec<u8>> {
    let output = match compression {
        CompressionType::None => data.to_vec(),
        CompressionType::Lz4 | CompressionType::Lz4Hc => {
            // Unity stores raw LZ4 blocks, not frames
            lz4_flex::block::decompress(data, uncompressed_size)?
        }
        CompressionType::Lzma | CompressionType::Lzham => return Err(unsupported(compression)),
    };

    if output.len() != uncompressed_size {
        return Err(BinaryError::decompression_failed(format!(
            "{} output size mismatch: expected {}, got {}",
            compression.name(),
            uncompressed_size,
            output.len()
        )));
    }

    Ok(output)
}
