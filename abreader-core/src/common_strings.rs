//! Common type-tree string table
//!
//! Type-tree nodes reference their type and field names either through the
//! file-local string buffer or, when the high bit of the reference is set,
//! through this engine-wide table. References into the table are byte
//! offsets into a null-separated blob.

use crate::error::{CoreError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Marker bit on a type-tree string reference selecting the common table
pub const COMMON_STRING_FLAG: u32 = 0x8000_0000;

const COMMON_STRING_BLOB: &[u8] = b"AABB\0AnimationClip\0AnimationCurve\0AnimationState\0Array\0\
Base\0BitField\0bitset\0bool\0char\0ColorRGBA\0Component\0data\0deque\0double\0dynamic_array\0\
FastPropertyName\0first\0float\0Font\0GameObject\0Generic Mono\0GradientNEW\0GUID\0GUIStyle\0\
int\0list\0long long\0map\0Matrix4x4f\0MdFour\0MonoBehaviour\0MonoScript\0m_ByteSize\0m_Curve\0\
m_EditorClassIdentifier\0m_EditorHideFlags\0m_Enabled\0m_ExtensionPtr\0m_GameObject\0m_Index\0\
m_IsArray\0m_IsStatic\0m_MetaFlag\0m_Name\0m_ObjectHideFlags\0m_PrefabInternal\0\
m_PrefabParentObject\0m_Script\0m_StaticEditorFlags\0m_Type\0m_Version\0Object\0pair\0\
PPtr<Component>\0PPtr<GameObject>\0PPtr<Material>\0PPtr<MonoBehaviour>\0PPtr<MonoScript>\0\
PPtr<Object>\0PPtr<Prefab>\0PPtr<Sprite>\0PPtr<TextAsset>\0PPtr<Texture>\0PPtr<Texture2D>\0\
PPtr<Transform>\0Prefab\0Quaternionf\0Rectf\0RectInt\0RectOffset\0second\0set\0short\0size\0\
SInt16\0SInt32\0SInt64\0SInt8\0staticvector\0string\0TextAsset\0TextMesh\0Texture\0Texture2D\0\
Transform\0TypelessData\0UInt16\0UInt32\0UInt64\0UInt8\0unsigned int\0unsigned long long\0\
unsigned short\0vector\0Vector2f\0Vector3f\0Vector4f\0m_ScriptingClassIdentifier\0Gradient\0\
Type*\0int2_storage\0int3_storage\0BoundsInt\0m_CorrespondingSourceObject\0m_PrefabInstance\0\
m_PrefabAsset\0FileSize\0Hash128\0";

/// Offset-indexed view of a null-separated string blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonStrings {
    by_offset: IndexMap<u32, String>,
}

impl CommonStrings {
    /// The engine's built-in table
    pub fn builtin() -> Self {
        // The embedded blob is ASCII and terminated, so this cannot fail.
        Self::from_blob(COMMON_STRING_BLOB).unwrap_or_else(|_| Self {
            by_offset: IndexMap::new(),
        })
    }

    /// Split a null-separated blob into offset-keyed entries
    pub fn from_blob(blob: &[u8]) -> Result<Self> {
        if !blob.is_empty() && blob.last() != Some(&0) {
            return Err(CoreError::common_strings("blob is not null-terminated"));
        }

        let mut by_offset = IndexMap::new();
        let mut offset = 0usize;
        for chunk in blob.split(|&b| b == 0) {
            if offset >= blob.len() {
                break;
            }
            let text = std::str::from_utf8(chunk)
                .map_err(|e| CoreError::common_strings(format!("offset {}: {}", offset, e)))?;
            by_offset.insert(offset as u32, text.to_string());
            offset += chunk.len() + 1;
        }

        Ok(Self { by_offset })
    }

    /// Look up a string by its byte offset in the blob
    pub fn get(&self, offset: u32) -> Option<&str> {
        self.by_offset.get(&offset).map(String::as_str)
    }

    /// Resolve a raw type-tree reference carrying [`COMMON_STRING_FLAG`]
    pub fn resolve_reference(&self, reference: u32) -> Option<&str> {
        if reference & COMMON_STRING_FLAG == 0 {
            return None;
        }
        self.get(reference & !COMMON_STRING_FLAG)
    }

    /// Number of strings in the table
    pub fn len(&self) -> usize {
        self.by_offset.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.by_offset.is_empty()
    }
}

impl Default for CommonStrings {
    fn default() -> Self {
        Self::builtin()
    }
}
