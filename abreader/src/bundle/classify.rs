//! Sub-file classification
//!
//! Bundles carry no marker telling serialized files from raw resource
//! blobs, so each node's bytes are inspected: text mentioning "unity" at the
//! start marks a resource, otherwise a serialized-file header is parsed and
//! must agree with the slice length.

use super::types::SubFileKind;
use crate::reader::{ByteCursor, ByteOrder};
use crate::error::Result;

/// Smallest slice that can hold a serialized-file header
const MIN_SERIALIZED_LEN: usize = 20;
/// Smallest slice that can hold a version 22+ header
const MIN_WIDE_HEADER_LEN: usize = 48;

/// Header fields read while probing a slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedHeader {
    pub metadata_size: u64,
    pub file_size: u64,
    pub version: u32,
    pub data_offset: u64,
}

/// Classify a sub-file by content
pub fn classify(content: &[u8]) -> SubFileKind {
    if detect_serialized_header(content).is_some() {
        SubFileKind::SerializedFile
    } else {
        SubFileKind::ResourceBlob
    }
}

/// Look for a serialized-file header that matches the slice
pub fn detect_serialized_header(content: &[u8]) -> Option<DetectedHeader> {
    if content.len() < MIN_SERIALIZED_LEN || leads_with_unity_text(content) {
        return None;
    }

    let header = read_detected(content).ok()??;
    let len = content.len() as u64;
    (header.file_size == len && header.data_offset <= len).then_some(header)
}

fn leads_with_unity_text(content: &[u8]) -> bool {
    let mut cursor = ByteCursor::new(content, ByteOrder::Big);
    cursor
        .read_zero_delimited()
        .ok()
        .and_then(|bytes| std::str::from_utf8(bytes).ok())
        .is_some_and(|text| text.to_ascii_lowercase().contains("unity"))
}

fn read_detected(content: &[u8]) -> Result<Option<DetectedHeader>> {
    let mut cursor = ByteCursor::new(content, ByteOrder::Big);
    let mut header = DetectedHeader {
        metadata_size: cursor.read_u32()? as u64,
        file_size: cursor.read_u32()? as u64,
        version: cursor.read_u32()?,
        data_offset: cursor.read_u32()? as u64,
    };
    let _endian = cursor.read_u8()?;
    cursor.advance(3)?;

    if header.version >= 22 {
        if content.len() < MIN_WIDE_HEADER_LEN {
            return Ok(None);
        }
        header.metadata_size = cursor.read_u32()? as u64;
        header.file_size = cursor.read_u64()?;
        header.data_offset = cursor.read_u64()?;
    }

    Ok(Some(header))
}
