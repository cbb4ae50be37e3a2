//! Texture2D processing
//!
//! - `formats` - Pixel formats the decoder accepts
//! - `types` - Texture record, streaming reference, pixel buffer
//! - `reader` - Texture2D record reader
//! - `decoders` - Payload resolution, RGBA32 and ETC2 RGBA8 decoding
//!
//! # Examples
//!
//! ```rust,no_run
//! use abreader::{BundleSession, DecodeOptions, DecodedObject};
//!
//! let session = BundleSession::from_path("ui.ab", DecodeOptions::default())?;
//! for outcome in session.decode_all() {
//!     if let Ok(Some(DecodedObject::Texture(texture))) = outcome.result {
//!         let mut pixels = session.decode_texture_pixels(&texture)?;
//!         pixels.flip_vertical();
//!         pixels.into_rgba_image()?.save(format!("{}.png", texture.name))?;
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod decoders;
pub mod formats;
pub mod reader;
pub mod types;

pub use decoders::{
    Decoder, Etc2Decoder, Rgba32Decoder, decode_etc2_rgba8, decode_etc2_rgba8_bytes,
    decode_texture,
};
pub use formats::PixelFormat;
pub use reader::TextureReader;
pub use types::{PixelBuffer, PixelSource, StreamingRef, TextureRecord, TextureSettings};
