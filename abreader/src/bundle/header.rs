//! AssetBundle header parsing
//!
//! This module handles the fixed header at the start of a UnityFS bundle.
//! All header fields are big-endian.

use crate::compression::{ArchiveFlags, CompressionType};
use crate::error::{BinaryError, Result};
use crate::reader::ByteCursor;
use serde::{Deserialize, Serialize};

/// Bundle signature constants
pub mod signatures {
    pub const UNITY_FS: &str = "UnityFS";
}

/// AssetBundle header information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleHeader {
    /// Bundle signature, always "UnityFS" for supported files
    pub signature: String,
    /// Bundle format version
    pub version: u32,
    /// Unity version that created this bundle
    pub unity_version: String,
    /// Unity revision
    pub unity_revision: String,
    /// Total bundle size
    pub size: u64,
    /// Compressed block table size
    pub compressed_blocks_info_size: u32,
    /// Uncompressed block table size
    pub uncompressed_blocks_info_size: u32,
    /// Archive flags (compression type, block table location, padding)
    pub flags: u32,
    /// Byte length of the header as read
    pub header_size: u64,
}

impl BundleHeader {
    /// Parse the bundle header
    ///
    /// The cursor must be big-endian and positioned at the start of the file.
    pub fn from_cursor(cursor: &mut ByteCursor) -> Result<Self> {
        let signature = cursor.read_cstring()?;
        if signature != signatures::UNITY_FS {
            return Err(BinaryError::invalid_signature(
                signatures::UNITY_FS.to_string(),
                signature,
            ));
        }

        let version = cursor.read_u32()?;
        let unity_version = cursor.read_cstring()?;
        let unity_revision = cursor.read_cstring()?;

        let size_offset = cursor.position();
        let size = cursor.read_i64()?;
        let size = u64::try_from(size).map_err(|_| {
            BinaryError::invalid_format("bundle size", size_offset, format!("negative size {}", size))
        })?;

        let compressed_blocks_info_size = cursor.read_u32()?;
        let uncompressed_blocks_info_size = cursor.read_u32()?;
        let flags = cursor.read_u32()?;

        Ok(Self {
            signature,
            version,
            unity_version,
            unity_revision,
            size,
            compressed_blocks_info_size,
            uncompressed_blocks_info_size,
            flags,
            header_size: cursor.position(),
        })
    }

    /// Get the block table compression type from flags
    pub fn compression_type(&self) -> Result<CompressionType> {
        CompressionType::from_flags(self.flags)
    }

    /// Check if the block table is stored at the end of the file
    pub fn block_info_at_end(&self) -> bool {
        (self.flags & ArchiveFlags::BLOCK_INFO_AT_END) != 0
    }

    /// Check if the block table and directory are stored together
    pub fn blocks_info_combined(&self) -> bool {
        (self.flags & ArchiveFlags::BLOCKS_AND_DIRECTORY_INFO_COMBINED) != 0
    }

    /// Check if block data starts on a 16-byte boundary
    pub fn needs_padding_at_start(&self) -> bool {
        (self.flags & ArchiveFlags::BLOCK_INFO_NEEDS_PADDING_AT_START) != 0
    }
}
