//! Injected lookup configuration
//!
//! The decoder never consults global state directly; it is handed a
//! [`LookupTables`] value (usually shared through an `Arc`) holding the
//! class-id, texture-format and common-string tables.

use crate::common_strings::CommonStrings;
use crate::constants::{BUILTIN_CLASS_NAMES, BUILTIN_TEXTURE_FORMATS};
use crate::error::Result;
use crate::name_table::NameTable;
use serde::{Deserialize, Serialize};

/// All static tables the decoder needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupTables {
    /// Class id → class name
    pub class_names: NameTable,
    /// Texture format code → format name
    pub texture_formats: NameTable,
    /// Common type-tree strings
    pub common_strings: CommonStrings,
}

impl LookupTables {
    /// Tables compiled into the crate
    pub fn builtin() -> Self {
        Self {
            class_names: BUILTIN_CLASS_NAMES.clone(),
            texture_formats: BUILTIN_TEXTURE_FORMATS.clone(),
            common_strings: CommonStrings::builtin(),
        }
    }

    /// Build tables from JSON objects keyed by decimal code
    ///
    /// The common-string table stays the built-in one.
    pub fn from_json(class_json: &str, texture_format_json: &str) -> Result<Self> {
        Ok(Self {
            class_names: NameTable::from_json("class id", class_json)?,
            texture_formats: NameTable::from_json("texture format", texture_format_json)?,
            common_strings: CommonStrings::builtin(),
        })
    }

    /// Replace the common-string table with one split from `blob`
    pub fn with_common_strings(mut self, blob: &[u8]) -> Result<Self> {
        self.common_strings = CommonStrings::from_blob(blob)?;
        Ok(self)
    }

    /// Class name for an id
    pub fn class_name(&self, class_id: i32) -> Option<&str> {
        self.class_names.name(class_id)
    }

    /// Format name for a texture format code
    pub fn texture_format_name(&self, code: i32) -> Option<&str> {
        self.texture_formats.name(code)
    }
}

impl Default for LookupTables {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables() {
        let tables = LookupTables::builtin();
        assert_eq!(tables.class_name(28), Some("Texture2D"));
        assert_eq!(tables.texture_format_name(47), Some("ETC2_RGBA8"));
        assert_eq!(tables.common_strings.get(427), Some("m_Name"));
    }

    #[test]
    fn test_from_json_overrides() {
        let tables =
            LookupTables::from_json(r#"{"43": "Mesh"}"#, r#"{"4": "RGBA32"}"#).unwrap();
        assert_eq!(tables.class_name(43), Some("Mesh"));
        assert_eq!(tables.class_name(28), None);
        assert_eq!(tables.texture_format_name(4), Some("RGBA32"));
        assert!(!tables.common_strings.is_empty());
    }

    #[test]
    fn test_with_common_strings() {
        let tables = LookupTables::builtin()
            .with_common_strings(b"alpha\0beta\0")
            .unwrap();
        assert_eq!(tables.common_strings.get(6), Some("beta"));
    }
}
