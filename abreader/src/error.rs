//! Error types for asset-bundle decoding

use thiserror::Error;

/// Result type for decoding operations
pub type Result<T> = std::result::Result<T, BinaryError>;

/// Errors that can occur while decoding a bundle
#[derive(Error, Debug)]
pub enum BinaryError {
    /// I/O errors (only raised by the path-based constructors)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A field holds a value the format does not allow
    #[error("Invalid format at offset {offset} ({field}): {message}")]
    InvalidFormat {
        field: String,
        offset: u64,
        message: String,
    },

    /// Invalid signature
    #[error("Invalid signature: expected {expected}, got {actual}")]
    InvalidSignature { expected: String, actual: String },

    /// A read ran past the end of the buffer, or a declared range does not fit
    #[error("Not enough data at offset {offset}: expected {expected}, got {actual}")]
    NotEnoughData {
        expected: usize,
        actual: usize,
        offset: u64,
    },

    /// Unsupported compression format
    #[error("Unsupported compression: {0}")]
    UnsupportedCompression(String),

    /// Unsupported feature
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    /// Decompression failed
    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),

    /// Lookup tables could not be loaded
    #[error("Lookup table error: {0}")]
    Table(#[from] abreader_core::CoreError),
}

/// Coarse classification of a [`BinaryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Corrupt or mismatched data
    Format,
    /// Ran out of bytes
    Truncation,
    /// Recognized but not implemented
    Unsupported,
    /// Compressed payload was corrupt
    Decompression,
    /// Underlying I/O or configuration failure
    Io,
}

impl BinaryError {
    /// Create a new invalid format error
    pub fn invalid_format<F: Into<String>, S: Into<String>>(
        field: F,
        offset: u64,
        message: S,
    ) -> Self {
        Self::InvalidFormat {
            field: field.into(),
            offset,
            message: message.into(),
        }
    }

    /// Create a new not enough data error
    pub fn not_enough_data(expected: usize, actual: usize, offset: u64) -> Self {
        Self::NotEnoughData {
            expected,
            actual,
            offset,
        }
    }

    /// Create a new invalid signature error
    pub fn invalid_signature<S: Into<String>>(expected: S, actual: S) -> Self {
        Self::InvalidSignature {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a new unsupported compression error
    pub fn unsupported_compression<S: Into<String>>(compression: S) -> Self {
        Self::UnsupportedCompression(compression.into())
    }

    /// Create a new unsupported feature error
    pub fn unsupported<S: Into<String>>(feature: S) -> Self {
        Self::Unsupported(feature.into())
    }

    /// Create a new decompression failed error
    pub fn decompression_failed<S: Into<String>>(msg: S) -> Self {
        Self::DecompressionFailed(msg.into())
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BinaryError::Io(_) | BinaryError::Table(_) => ErrorKind::Io,
            BinaryError::InvalidFormat { .. } | BinaryError::InvalidSignature { .. } => {
                ErrorKind::Format
            }
            BinaryError::NotEnoughData { .. } => ErrorKind::Truncation,
            BinaryError::UnsupportedCompression(_) | BinaryError::Unsupported(_) => {
                ErrorKind::Unsupported
            }
            BinaryError::DecompressionFailed(_) => ErrorKind::Decompression,
        }
    }

    /// Whether the error means "not yet supported" rather than "corrupt"
    pub fn is_unsupported(&self) -> bool {
        self.kind() == ErrorKind::Unsupported
    }
}

// Conversion from other error types
impl From<lz4_flex::block::DecompressError> for BinaryError {
    fn from(err: lz4_flex::block::DecompressError) -> Self {
        Self::decompression_failed(format!("LZ4 block decompression failed: {}", err))
    }
}

impl From<std::string::FromUtf8Error> for BinaryError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::invalid_format("string", 0, format!("Invalid UTF-8 string: {}", err))
    }
}

impl From<std::str::Utf8Error> for BinaryError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::invalid_format("string", 0, format!("Invalid UTF-8 string: {}", err))
    }
}
