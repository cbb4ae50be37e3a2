//! UnityFS AssetBundle container
//!
//! - `header` - Bundle header parsing
//! - `types` - Block descriptors, directory nodes, sub-files
//! - `parser` - Block table, block decompression and file splitting
//! - `classify` - Serialized-file versus resource-blob detection
//!
//! # Examples
//!
//! ```rust,no_run
//! let data = std::fs::read("character.ab")?;
//! let bundle = abreader::bundle::load_bundle_from_memory(&data)?;
//! for file in &bundle.serialized_files {
//!     println!("{} ({} bytes)", file.path, file.data.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod classify;
pub mod header;
pub mod parser;
pub mod types;

pub use classify::{DetectedHeader, classify, detect_serialized_header};
pub use header::BundleHeader;
pub use parser::{BlockTable, BundleParser};
pub use types::{
    AssetBundle, BlockDescriptor, NodeDescriptor, ResourceBlobs, SubFile, SubFileKind, basename,
};

use crate::error::Result;
use std::path::Path;

/// Parse a bundle held in memory
pub fn load_bundle_from_memory(data: &[u8]) -> Result<AssetBundle> {
    BundleParser::parse(data)
}

/// Read and parse a bundle file
pub fn load_bundle<P: AsRef<Path>>(path: P) -> Result<AssetBundle> {
    let data = std::fs::read(path)?;
    BundleParser::parse(&data)
}
