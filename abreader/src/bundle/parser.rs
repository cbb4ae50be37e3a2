//! Bundle parser implementation
//!
//! Reads the header and block table, decompresses the block stream, and
//! splits it into sub-files.

use super::classify::classify;
use super::header::BundleHeader;
use super::types::{AssetBundle, BlockDescriptor, NodeDescriptor, ResourceBlobs, SubFile, SubFileKind};
use crate::compression::decompress;
use crate::error::{BinaryError, Result};
use crate::reader::{ByteCursor, ByteOrder};
use tracing::{debug, instrument, trace};

/// Length of the hash that opens the block table
const BLOCKS_INFO_HASH_LEN: usize = 16;

/// Decoded block table: block descriptors followed by directory nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockTable {
    /// Uncompressed data hash (not validated)
    pub hash: [u8; BLOCKS_INFO_HASH_LEN],
    /// Block descriptors
    pub blocks: Vec<BlockDescriptor>,
    /// Directory nodes
    pub nodes: Vec<NodeDescriptor>,
}

impl BlockTable {
    /// Parse a decompressed block table (big-endian)
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(data, ByteOrder::Big);

        let mut hash = [0u8; BLOCKS_INFO_HASH_LEN];
        hash.copy_from_slice(cursor.read(BLOCKS_INFO_HASH_LEN, false)?);

        let block_count = cursor.read_count("block count")?;
        let mut blocks = Vec::with_capacity(block_count.min(cursor.remaining() / 10));
        for _ in 0..block_count {
            let uncompressed_size = cursor.read_u32()?;
            let compressed_size = cursor.read_u32()?;
            let flags = cursor.read_u16()?;
            blocks.push(BlockDescriptor::new(uncompressed_size, compressed_size, flags));
        }

        let node_count = cursor.read_count("node count")?;
        let mut nodes = Vec::with_capacity(node_count.min(cursor.remaining() / 21));
        for _ in 0..node_count {
            let offset_pos = cursor.position();
            let offset = cursor.read_i64()?;
            let size = cursor.read_i64()?;
            let flags = cursor.read_u32()?;
            let path = cursor.read_cstring()?;

            let (Ok(offset), Ok(size)) = (u64::try_from(offset), u64::try_from(size)) else {
                return Err(BinaryError::invalid_format(
                    "node range",
                    offset_pos,
                    format!("negative offset or size ({}, {})", offset, size),
                ));
            };
            nodes.push(NodeDescriptor::new(path, offset, size, flags));
        }

        Ok(Self {
            hash,
            blocks,
            nodes,
        })
    }
}

/// Main bundle parser
pub struct BundleParser;

impl BundleParser {
    /// Parse a UnityFS bundle held in memory
    #[instrument(skip(data), fields(len = data.len()))]
    pub fn parse(data: &[u8]) -> Result<AssetBundle> {
        let mut cursor = ByteCursor::new(data, ByteOrder::Big);

        let header = BundleHeader::from_cursor(&mut cursor)?;
        debug!(
            version = header.version,
            unity_version = %header.unity_version,
            flags = header.flags,
            "parsed bundle header"
        );

        if header.block_info_at_end() {
            return Err(BinaryError::unsupported(
                "block table stored at end of file",
            ));
        }

        let table = Self::read_block_table(&header, &mut cursor)?;
        debug!(
            blocks = table.blocks.len(),
            nodes = table.nodes.len(),
            "parsed block table"
        );

        if header.needs_padding_at_start() {
            cursor.align_to(16);
        }

        let block_data = Self::read_blocks(&table.blocks, &mut cursor)?;
        let (serialized_files, resources) = Self::split_files(&table.nodes, &block_data)?;

        Ok(AssetBundle {
            header,
            blocks: table.blocks,
            nodes: table.nodes,
            serialized_files,
            resources,
            block_data_len: block_data.len(),
        })
    }

    /// Read and decompress the block table that follows the header
    fn read_block_table(header: &BundleHeader, cursor: &mut ByteCursor) -> Result<BlockTable> {
        if header.version >= 7 {
            cursor.align_to(16);
        }

        let compression = header.compression_type()?;
        compression.ensure_supported()?;
        let raw = cursor.read(header.compressed_blocks_info_size as usize, false)?;
        let table_bytes = decompress(
            raw,
            compression,
            header.uncompressed_blocks_info_size as usize,
        )?;
        BlockTable::from_bytes(&table_bytes)
    }

    /// Decompress every block and concatenate in descriptor order
    pub fn read_blocks(blocks: &[BlockDescriptor], cursor: &mut ByteCursor) -> Result<Vec<u8>> {
        let expected: u64 = blocks.iter().map(|b| b.uncompressed_size as u64).sum();
        let mut output = Vec::with_capacity(expected.min(cursor.len() as u64 * 4) as usize);

        for (index, block) in blocks.iter().enumerate() {
            let compression = block.compression_type()?;
            compression.ensure_supported()?;
            let raw = cursor.read(block.compressed_size as usize, false)?;
            trace!(
                index,
                compression = compression.name(),
                compressed = block.compressed_size,
                uncompressed = block.uncompressed_size,
                "decompressing block"
            );
            let chunk = decompress(raw, compression, block.uncompressed_size as usize)?;
            output.extend_from_slice(&chunk);
        }

        if output.len() as u64 != expected {
            return Err(BinaryError::decompression_failed(format!(
                "block stream is {} bytes, blocks declare {}",
                output.len(),
                expected
            )));
        }

        Ok(output)
    }

    /// Slice the block stream by node and classify each slice
    pub fn split_files(
        nodes: &[NodeDescriptor],
        block_data: &[u8],
    ) -> Result<(Vec<SubFile>, ResourceBlobs)> {
        let mut serialized = Vec::new();
        let mut resources = ResourceBlobs::new();

        for node in nodes {
            let slice = node
                .end_offset()
                .filter(|&end| end <= block_data.len() as u64)
                .map(|end| &block_data[node.offset as usize..end as usize])
                .ok_or_else(|| {
                    BinaryError::not_enough_data(
                        node.offset.saturating_add(node.size) as usize,
                        block_data.len(),
                        node.offset,
                    )
                })?;

            let kind = classify(slice);
            debug!(path = %node.path, size = node.size, ?kind, "classified sub-file");
            match kind {
                SubFileKind::SerializedFile => serialized.push(SubFile {
                    path: node.path.clone(),
                    kind,
                    data: slice.to_vec(),
                }),
                SubFileKind::ResourceBlob => resources.insert(node.path.clone(), slice.to_vec()),
            }
        }

        Ok((serialized, resources))
    }
}
