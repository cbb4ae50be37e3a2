//! Bundle data structures
//!
//! This module defines the block table entries, directory nodes and the
//! split sub-files of a parsed bundle.

use super::header::BundleHeader;
use crate::compression::{BlockFlags, CompressionType};
use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One compressed segment of the bundle payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDescriptor {
    /// Size after decompression
    pub uncompressed_size: u32,
    /// Size as stored
    pub compressed_size: u32,
    /// Compression kind and streaming bit
    pub flags: u16,
}

impl BlockDescriptor {
    /// Create a new block descriptor
    pub fn new(uncompressed_size: u32, compressed_size: u32, flags: u16) -> Self {
        Self {
            uncompressed_size,
            compressed_size,
            flags,
        }
    }

    /// Get the compression type for this block
    pub fn compression_type(&self) -> Result<CompressionType> {
        CompressionType::from_flags((self.flags & BlockFlags::COMPRESSION_TYPE_MASK) as u32)
    }

    /// Check if the block is flagged as streamed
    pub fn is_streamed(&self) -> bool {
        (self.flags & BlockFlags::STREAMED) != 0
    }
}

/// A named byte range inside the decompressed block stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    /// Offset into the decompressed block stream
    pub offset: u64,
    /// Size of the sub-file
    pub size: u64,
    /// Node flags
    pub flags: u32,
    /// Sub-file path
    pub path: String,
}

impl NodeDescriptor {
    /// Create a new node descriptor
    pub fn new(path: String, offset: u64, size: u64, flags: u32) -> Self {
        Self {
            offset,
            size,
            flags,
            path,
        }
    }

    /// Get the end offset of this node
    pub fn end_offset(&self) -> Option<u64> {
        self.offset.checked_add(self.size)
    }

    /// Unity marks serialized files with bit 2. Recorded only; the
    /// content heuristic decides classification.
    pub fn is_serialized_flag(&self) -> bool {
        (self.flags & 0x4) != 0
    }

    /// Final path component
    pub fn basename(&self) -> &str {
        basename(&self.path)
    }
}

/// Final component of a `/`-separated path
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Classification of a sub-file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubFileKind {
    /// Has its own header, type table and object table
    SerializedFile,
    /// Opaque bytes referenced by streaming data
    ResourceBlob,
}

/// One sub-file sliced out of the block stream
#[derive(Debug, Clone)]
pub struct SubFile {
    /// Node path
    pub path: String,
    /// How the content was classified
    pub kind: SubFileKind,
    /// Sub-file bytes
    pub data: Vec<u8>,
}

impl SubFile {
    /// Check if this sub-file is a serialized file
    pub fn is_serialized(&self) -> bool {
        self.kind == SubFileKind::SerializedFile
    }
}

/// Resource blobs keyed by node path, in bundle order
#[derive(Debug, Clone, Default)]
pub struct ResourceBlobs {
    blobs: IndexMap<String, Vec<u8>>,
}

impl ResourceBlobs {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a blob
    pub fn insert(&mut self, path: String, data: Vec<u8>) {
        self.blobs.insert(path, data);
    }

    /// Find a blob by exact path, falling back to a basename match
    ///
    /// Streaming references carry archive paths such as
    /// `archive:/CAB-x/CAB-x.resS` while nodes are named `CAB-x.resS`.
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        if let Some(data) = self.blobs.get(path) {
            return Some(data);
        }
        let wanted = basename(path);
        self.blobs
            .iter()
            .find(|(key, _)| basename(key) == wanted)
            .map(|(_, data)| data.as_slice())
    }

    /// Number of blobs
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Check if there are no blobs
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Blob paths in bundle order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.blobs.keys().map(String::as_str)
    }
}

/// A parsed UnityFS bundle
#[derive(Debug, Clone)]
pub struct AssetBundle {
    /// Bundle header
    pub header: BundleHeader,
    /// Block table
    pub blocks: Vec<BlockDescriptor>,
    /// Directory nodes
    pub nodes: Vec<NodeDescriptor>,
    /// Sub-files classified as serialized files, in node order
    pub serialized_files: Vec<SubFile>,
    /// Sub-files classified as resource blobs
    pub resources: ResourceBlobs,
    /// Length of the concatenated decompressed block stream
    pub block_data_len: usize,
}

impl AssetBundle {
    /// Sum of the declared uncompressed block sizes
    pub fn declared_uncompressed_size(&self) -> u64 {
        self.blocks
            .iter()
            .map(|b| b.uncompressed_size as u64)
            .sum()
    }

    /// Find a node by path
    pub fn find_node(&self, path: &str) -> Option<&NodeDescriptor> {
        self.nodes.iter().find(|node| node.path == path)
    }

    /// Get all node paths
    pub fn node_paths(&self) -> Vec<&str> {
        self.nodes.iter().map(|node| node.path.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_flags() {
        let block = BlockDescriptor::new(100, 80, 0x42);
        assert_eq!(block.compression_type().unwrap(), CompressionType::Lz4);
        assert!(block.is_streamed());
        let plain = BlockDescriptor::new(100, 100, 0);
        assert_eq!(plain.compression_type().unwrap(), CompressionType::None);
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("archive:/CAB-1/CAB-1.resS"), "CAB-1.resS");
        assert_eq!(basename("CAB-1.resS"), "CAB-1.resS");
        let node = NodeDescriptor::new("a/b".into(), 0, 4, 4);
        assert_eq!(node.basename(), "b");
        assert!(node.is_serialized_flag());
        assert_eq!(node.end_offset(), Some(4));
    }

    #[test]
    fn test_resource_lookup_by_basename() {
        let mut blobs = ResourceBlobs::new();
        blobs.insert("CAB-1.resS".into(), vec![1, 2, 3]);
        assert_eq!(blobs.get("CAB-1.resS"), Some(&[1u8, 2, 3][..]));
        assert_eq!(blobs.get("archive:/CAB-1/CAB-1.resS"), Some(&[1u8, 2, 3][..]));
        assert_eq!(blobs.get("archive:/CAB-2/CAB-2.resS"), None);
    }
}
