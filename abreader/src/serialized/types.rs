//! Serialized-file data structures

use super::header::SerializedFileHeader;
use super::typetree::TypeTree;
use crate::error::{BinaryError, Result};
use crate::reader::{ByteCursor, ByteOrder};
use serde::{Deserialize, Serialize};

/// One entry of the type table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEntry {
    pub class_id: i32,
    pub is_stripped: bool,
    pub script_type_index: Option<i16>,
    pub script_id: Option<[u8; 16]>,
    pub type_hash: Option<[u8; 16]>,
    pub type_tree: Option<TypeTree>,
    pub type_dependencies: Vec<i32>,
}

/// One entry of the object table
///
/// `byte_start` is absolute within the serialized file (the data offset has
/// already been added).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub path_id: i64,
    pub byte_start: u64,
    pub byte_size: u32,
    pub type_id: i32,
    pub class_id: i32,
}

impl ObjectEntry {
    /// End of the object's bytes, if it does not overflow
    pub fn byte_end(&self) -> Option<u64> {
        self.byte_start.checked_add(self.byte_size as u64)
    }
}

/// A parsed serialized file that owns its bytes
#[derive(Debug, Clone)]
pub struct SerializedFile {
    /// Node path inside the bundle
    pub name: String,
    pub header: SerializedFileHeader,
    pub unity_version: String,
    pub target_platform: i32,
    pub enable_type_tree: bool,
    pub big_id_enabled: bool,
    pub types: Vec<TypeEntry>,
    pub objects: Vec<ObjectEntry>,
    pub user_information: String,
    pub(crate) data: Vec<u8>,
}

impl SerializedFile {
    /// Format version
    pub fn version(&self) -> u32 {
        self.header.version
    }

    /// Raw file bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Find an object by path id
    pub fn object(&self, path_id: i64) -> Option<&ObjectEntry> {
        self.objects.iter().find(|o| o.path_id == path_id)
    }

    /// Objects of one class
    pub fn objects_of_class(&self, class_id: i32) -> impl Iterator<Item = &ObjectEntry> {
        self.objects.iter().filter(move |o| o.class_id == class_id)
    }

    /// Little-endian cursor over exactly the object's bytes
    pub fn object_cursor(&self, entry: &ObjectEntry) -> Result<ByteCursor<'_>> {
        let start = usize::try_from(entry.byte_start).map_err(|_| {
            BinaryError::not_enough_data(usize::MAX, self.data.len(), entry.byte_start)
        })?;
        ByteCursor::new(&self.data, ByteOrder::Little).sub_cursor(start, entry.byte_size as usize)
    }
}
