//! abreader core
//!
//! Static lookup data shared by the asset-bundle decoder: the class-id and
//! texture-format name tables and the common type-tree string table. The
//! tables are plain immutable values; the decoder receives them through
//! [`LookupTables`] instead of reading globals.

pub mod common_strings;
pub mod constants;
pub mod error;
pub mod lookup;
pub mod name_table;

// Re-export main types
pub use common_strings::{COMMON_STRING_FLAG, CommonStrings};
pub use constants::{BUILTIN_CLASS_NAMES, BUILTIN_TEXTURE_FORMATS, class_ids, texture_formats};
pub use error::{CoreError, Result};
pub use lookup::LookupTables;
pub use name_table::NameTable;

/// Get a class name from the built-in table
pub fn get_class_name(class_id: i32) -> Option<&'static str> {
    BUILTIN_CLASS_NAMES.name(class_id)
}
