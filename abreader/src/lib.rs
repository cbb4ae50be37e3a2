//! Unity AssetBundle decoder
//!
//! Decodes UnityFS asset bundles down to texture pixels and mesh geometry:
//! - UnityFS containers (LZ4 block compression, file splitting)
//! - SerializedFile type and object tables
//! - Texture2D records (RGBA32, ETC2 RGBA8)
//! - Mesh records (static, 16-bit indices, float positions and UVs)
//!
//! Lookup tables (class names, texture formats, common type-tree strings)
//! come from the `abreader-core` crate and are injected through
//! [`DecodeOptions`].
//!
//! # Example
//!
//! ```rust,no_run
//! use abreader::{BundleSession, DecodeOptions, DecodedObject};
//!
//! let session = BundleSession::from_path("level.ab", DecodeOptions::default())?;
//! for (file, entry, class_name) in session.objects() {
//!     println!("{} {} {:?}", file, entry.path_id, class_name);
//! }
//!
//! for outcome in session.decode_all() {
//!     match outcome.result {
//!         Ok(Some(DecodedObject::Mesh(mesh))) => {
//!             println!("{}: {} triangles", mesh.name, mesh.triangle_count());
//!         }
//!         Ok(Some(DecodedObject::Texture(texture))) => {
//!             let pixels = session.decode_texture_pixels(&texture)?;
//!             println!("{}: {}x{}", texture.name, pixels.width, pixels.height);
//!         }
//!         Ok(None) => {}
//!         Err(err) => eprintln!("object {}: {}", outcome.path_id, err),
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bundle;
pub mod compression;
pub mod error;
pub mod mesh;
pub mod options;
pub mod reader;
pub mod serialized;
pub mod session;
pub mod texture;
pub mod versioned;

// Re-export main types
pub use bundle::{AssetBundle, BundleHeader, BundleParser, ResourceBlobs};
pub use compression::CompressionType;
pub use error::{BinaryError, ErrorKind, Result};
pub use mesh::{MeshReader, MeshRecord};
pub use options::DecodeOptions;
pub use reader::{ByteCursor, ByteOrder};
pub use serialized::{ObjectEntry, SerializedFile, SerializedFileParser, TypeEntry};
pub use session::{BundleSession, DecodedObject, ObjectOutcome};
pub use texture::{
    PixelBuffer, PixelFormat, PixelSource, StreamingRef, TextureReader, TextureRecord,
    decode_etc2_rgba8, decode_texture,
};

pub use abreader_core::LookupTables;
