//! Error types for lookup-table loading

use thiserror::Error;

/// Result type alias for lookup-table operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while building lookup tables
#[derive(Error, Debug)]
pub enum CoreError {
    /// The table source was not valid JSON
    #[error("JSON error in {table} table: {source}")]
    Json {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A table key could not be interpreted as a numeric code
    #[error("Invalid key '{key}' in {table} table")]
    InvalidKey { table: &'static str, key: String },

    /// The common-string blob is malformed
    #[error("Invalid common string blob: {message}")]
    CommonStrings { message: String },
}

impl CoreError {
    /// Create an invalid key error
    pub fn invalid_key<S: Into<String>>(table: &'static str, key: S) -> Self {
        Self::InvalidKey {
            table,
            key: key.into(),
        }
    }

    /// Create a common string blob error
    pub fn common_strings<S: Into<String>>(message: S) -> Self {
        Self::CommonStrings {
            message: message.into(),
        }
    }
}
