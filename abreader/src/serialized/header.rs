//! Serialized-file header
//!
//! The header is always big-endian. Version 22 and later repeat the size
//! fields in 64-bit form after the endian byte.

use crate::error::{BinaryError, Result};
use crate::reader::ByteCursor;
use crate::versioned::{VersionedField, read_fields};
use serde::{Deserialize, Serialize};

/// First version with the endian byte in the header
pub const ENDIAN_IN_HEADER_VERSION: u32 = 9;
/// First version with 64-bit size fields
pub const WIDE_HEADER_VERSION: u32 = 22;

/// Serialized-file header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedFileHeader {
    pub metadata_size: u64,
    pub file_size: u64,
    pub version: u32,
    pub data_offset: u64,
    /// Endianness of the metadata and object data (0 = little-endian)
    pub endian: u8,
    pub reserved: [u8; 3],
    /// Version 22+ trailing field of unknown meaning
    pub unknown: u64,
}

const WIDE_FIELDS: &[VersionedField<SerializedFileHeader>] = &[
    VersionedField::since("metadata size", WIDE_HEADER_VERSION, |c, h| {
        h.metadata_size = c.read_u32()? as u64;
        Ok(())
    }),
    VersionedField::since("file size", WIDE_HEADER_VERSION, |c, h| {
        h.file_size = read_wide_size(c, "file size")?;
        Ok(())
    }),
    VersionedField::since("data offset", WIDE_HEADER_VERSION, |c, h| {
        h.data_offset = read_wide_size(c, "data offset")?;
        Ok(())
    }),
    VersionedField::since("unknown", WIDE_HEADER_VERSION, |c, h| {
        h.unknown = c.read_u64()?;
        Ok(())
    }),
];

fn read_wide_size(cursor: &mut ByteCursor, field: &str) -> Result<u64> {
    let offset = cursor.position();
    let value = cursor.read_i64()?;
    u64::try_from(value)
        .map_err(|_| BinaryError::invalid_format(field, offset, format!("negative value {}", value)))
}

impl SerializedFileHeader {
    /// Parse the header from a big-endian cursor at the start of the file
    pub fn from_cursor(cursor: &mut ByteCursor) -> Result<Self> {
        let mut header = Self {
            metadata_size: cursor.read_u32()? as u64,
            file_size: cursor.read_u32()? as u64,
            version: cursor.read_u32()?,
            data_offset: cursor.read_u32()? as u64,
            ..Default::default()
        };

        if header.version >= ENDIAN_IN_HEADER_VERSION {
            let offset = cursor.position();
            header.endian = cursor.read_u8()?;
            // Nothing past the endian byte is read when it is wrong
            check_endian(header.endian, offset)?;
            header.reserved.copy_from_slice(cursor.read(3, false)?);
        } else {
            let offset = header.file_size.checked_sub(header.metadata_size).ok_or_else(|| {
                BinaryError::invalid_format(
                    "metadata size",
                    0,
                    "metadata larger than the file",
                )
            })?;
            let resume = cursor.position();
            cursor.seek(offset)?;
            header.endian = cursor.read_u8()?;
            check_endian(header.endian, offset)?;
            cursor.seek(resume)?;
        }

        read_fields(WIDE_FIELDS, header.version, cursor, &mut header)?;
        Ok(header)
    }

    /// Whether the metadata and objects are big-endian
    pub fn is_big_endian(&self) -> bool {
        self.endian != 0
    }
}

fn check_endian(endian: u8, offset: u64) -> Result<()> {
    if endian == 0 {
        Ok(())
    } else {
        Err(BinaryError::invalid_format(
            "endian",
            offset,
            format!("big-endian object data is not supported (endian byte {})", endian),
        ))
    }
}
