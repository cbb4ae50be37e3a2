//! Type-tree skipping
//!
//! Type trees describe object layouts. The decoder never interprets them,
//! but they sit inline in the type table and must be consumed byte-exactly.
//! Node names are still resolved so the tree can be inspected.

use crate::error::{BinaryError, Result};
use crate::reader::ByteCursor;
use abreader_core::{COMMON_STRING_FLAG, CommonStrings};
use serde::{Deserialize, Serialize};

/// One flattened type-tree node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTreeNode {
    pub version: u16,
    pub level: u8,
    pub type_flags: u8,
    pub type_str_offset: u32,
    pub name_str_offset: u32,
    pub byte_size: i32,
    pub index: i32,
    pub meta_flags: i32,
    /// Present from format version 19
    pub ref_type_hash: Option<u64>,
    /// Resolved type name, if the reference could be resolved
    pub type_name: Option<String>,
    /// Resolved field name, if the reference could be resolved
    pub name: Option<String>,
}

/// A type tree in blob layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTree {
    pub nodes: Vec<TypeTreeNode>,
    pub string_buffer: Vec<u8>,
}

impl TypeTree {
    /// Read a blob-layout type tree (format version 10 or 12+)
    pub fn from_cursor(
        cursor: &mut ByteCursor,
        version: u32,
        common_strings: &CommonStrings,
    ) -> Result<Self> {
        if version < 12 && version != 10 {
            return Err(BinaryError::unsupported(format!(
                "legacy type-tree layout (format version {})",
                version
            )));
        }

        let node_count = cursor.read_count("type-tree node count")?;
        let string_buffer_size = cursor.read_count("type-tree string buffer size")?;

        let node_size = if version >= 19 { 32 } else { 24 };
        if !cursor.has_bytes(node_count.saturating_mul(node_size)) {
            return Err(BinaryError::not_enough_data(
                node_count.saturating_mul(node_size),
                cursor.remaining(),
                cursor.position(),
            ));
        }

        let mut nodes = Vec::with_capacity(node_count);
        for _ in 0..node_count {
            nodes.push(TypeTreeNode {
                version: cursor.read_u16()?,
                level: cursor.read_u8()?,
                type_flags: cursor.read_u8()?,
                type_str_offset: cursor.read_u32()?,
                name_str_offset: cursor.read_u32()?,
                byte_size: cursor.read_i32()?,
                index: cursor.read_i32()?,
                meta_flags: cursor.read_i32()?,
                ref_type_hash: if version >= 19 {
                    Some(cursor.read_u64()?)
                } else {
                    None
                },
                type_name: None,
                name: None,
            });
        }

        let string_buffer = cursor.read_bytes(string_buffer_size)?;
        for node in &mut nodes {
            node.type_name = resolve_string(&string_buffer, common_strings, node.type_str_offset);
            node.name = resolve_string(&string_buffer, common_strings, node.name_str_offset);
        }

        Ok(Self {
            nodes,
            string_buffer,
        })
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root type name
    pub fn root_type(&self) -> Option<&str> {
        self.nodes.first().and_then(|n| n.type_name.as_deref())
    }
}

/// Resolve a string reference against the local buffer or the common table
pub fn resolve_string(buffer: &[u8], common: &CommonStrings, reference: u32) -> Option<String> {
    if reference & COMMON_STRING_FLAG != 0 {
        return common.resolve_reference(reference).map(str::to_string);
    }

    let start = reference as usize;
    let rest = buffer.get(start..)?;
    let end = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
    std::str::from_utf8(&rest[..end]).ok().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::reader::ByteOrder;

    fn node_bytes(level: u8, type_ref: u32, name_ref: u32, with_hash: bool) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&1u16.to_le_bytes());
        out.push(level);
        out.push(0);
        out.extend_from_slice(&type_ref.to_le_bytes());
        out.extend_from_slice(&name_ref.to_le_bytes());
        out.extend_from_slice(&(-1i32).to_le_bytes());
        out.extend_from_slice(&0i32.to_le_bytes());
        out.extend_from_slice(&0x8000i32.to_le_bytes());
        if with_hash {
            out.extend_from_slice(&0u64.to_le_bytes());
        }
        out
    }

    #[test]
    fn test_blob_tree_consumed_exactly() {
        let strings = b"Custom\0field\0";
        let mut data = Vec::new();
        data.extend_from_slice(&2i32.to_le_bytes());
        data.extend_from_slice(&(strings.len() as i32).to_le_bytes());
        data.extend(node_bytes(0, 0, 0x8000_0000 | 427, true));
        data.extend(node_bytes(1, 0x8000_0000 | 222, 7, true));
        data.extend_from_slice(strings);
        data.push(0x5A);

        let mut cursor = ByteCursor::new(&data, ByteOrder::Little);
        let tree = TypeTree::from_cursor(&mut cursor, 22, &CommonStrings::builtin()).unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.root_type(), Some("Custom"));
        assert_eq!(tree.nodes[0].name.as_deref(), Some("m_Name"));
        assert_eq!(tree.nodes[1].type_name.as_deref(), Some("int"));
        assert_eq!(tree.nodes[1].name.as_deref(), Some("field"));
        assert_eq!(cursor.read_u8().unwrap(), 0x5A);
    }

    #[test]
    fn test_pre_19_nodes_have_no_hash() {
        let mut data = Vec::new();
        data.extend_from_slice(&1i32.to_le_bytes());
        data.extend_from_slice(&0i32.to_le_bytes());
        data.extend(node_bytes(0, 0x8000_0000, 0x8000_0000 | 5, false));

        let mut cursor = ByteCursor::new(&data, ByteOrder::Little);
        let tree = TypeTree::from_cursor(&mut cursor, 17, &CommonStrings::builtin()).unwrap();
        assert_eq!(tree.nodes[0].ref_type_hash, None);
        assert_eq!(tree.root_type(), Some("AABB"));
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_unknown_references_resolve_to_none() {
        let common = CommonStrings::builtin();
        assert_eq!(resolve_string(b"abc\0", &common, 10), None);
        assert_eq!(resolve_string(b"abc\0", &common, 0x8000_0001), None);
        assert_eq!(resolve_string(b"abc", &common, 1).as_deref(), Some("bc"));
    }

    #[test]
    fn test_legacy_layout_unsupported() {
        let data = [0u8; 8];
        let mut cursor = ByteCursor::new(&data, ByteOrder::Little);
        let err = TypeTree::from_cursor(&mut cursor, 9, &CommonStrings::builtin()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }
}
