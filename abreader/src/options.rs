//! Decode options
//!
//! Lookup tables and the few knobs that change how strictly payloads are
//! checked. Options are passed explicitly; nothing is read from the
//! environment.

use abreader_core::LookupTables;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Largest accepted texture edge by default
pub const DEFAULT_MAX_TEXTURE_DIMENSION: u32 = 16384;

static BUILTIN_TABLES: Lazy<Arc<LookupTables>> = Lazy::new(|| Arc::new(LookupTables::builtin()));

/// Shared handle to the built-in lookup tables
pub fn builtin_tables() -> Arc<LookupTables> {
    Arc::clone(&BUILTIN_TABLES)
}

/// Options for decoding bundles and objects
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Class-name, texture-format and common-string tables
    pub tables: Arc<LookupTables>,
    /// RGBA32 payloads must be exactly `width * height * 4` bytes
    pub strict_rgba32_size: bool,
    /// Texture edges above this are rejected before allocating
    pub max_texture_dimension: u32,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            tables: builtin_tables(),
            strict_rgba32_size: true,
            max_texture_dimension: DEFAULT_MAX_TEXTURE_DIMENSION,
        }
    }
}

impl DecodeOptions {
    /// Create options with every check enabled
    pub fn strict() -> Self {
        Self::default()
    }

    /// Create options that accept trailing mip data after RGBA32 pixels
    pub fn lenient() -> Self {
        Self {
            strict_rgba32_size: false,
            ..Self::default()
        }
    }

    /// Replace the lookup tables
    pub fn with_tables(mut self, tables: LookupTables) -> Self {
        self.tables = Arc::new(tables);
        self
    }

    /// Replace the maximum texture dimension
    pub fn with_max_texture_dimension(mut self, max: u32) -> Self {
        self.max_texture_dimension = max;
        self
    }
}
