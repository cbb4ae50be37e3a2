//! Unity SerializedFile processing
//!
//! A serialized file is the container for objects inside a bundle: a
//! big-endian header, a little-endian metadata block with the type and
//! object tables, then the object payloads.

pub mod header;
pub mod parser;
pub mod types;
pub mod typetree;

pub use header::SerializedFileHeader;
pub use parser::SerializedFileParser;
pub use types::{ObjectEntry, SerializedFile, TypeEntry};
pub use typetree::{TypeTree, TypeTreeNode};
