//! Numeric-code to symbolic-name tables
//!
//! Both the class-id table and the texture-format table share one shape:
//! a closed set of integer codes, each mapped to a single name. Tables are
//! built once and never mutated afterwards.

use crate::error::{CoreError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Immutable mapping from numeric codes to names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameTable {
    /// Table label used in error messages
    label: String,
    entries: IndexMap<i32, String>,
}

impl NameTable {
    /// Build a table from `(code, name)` pairs
    pub fn from_pairs<'a, I>(label: &str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (i32, &'a str)>,
    {
        Self {
            label: label.to_string(),
            entries: pairs
                .into_iter()
                .map(|(code, name)| (code, name.to_string()))
                .collect(),
        }
    }

    /// Build a table from a JSON object shaped like `{"28": "Texture2D"}`
    pub fn from_json(label: &'static str, json: &str) -> Result<Self> {
        let raw: IndexMap<String, String> =
            serde_json::from_str(json).map_err(|source| CoreError::Json {
                table: label,
                source,
            })?;

        let mut entries = IndexMap::with_capacity(raw.len());
        for (key, name) in raw {
            let code = key
                .trim()
                .parse::<i32>()
                .map_err(|_| CoreError::invalid_key(label, key.clone()))?;
            entries.insert(code, name);
        }

        Ok(Self {
            label: label.to_string(),
            entries,
        })
    }

    /// Table label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Look up the name for a code
    pub fn name(&self, code: i32) -> Option<&str> {
        self.entries.get(&code).map(String::as_str)
    }

    /// Reverse lookup: the first code registered under `name`
    pub fn code(&self, name: &str) -> Option<i32> {
        self.entries
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(code, _)| *code)
    }

    /// Check whether a code is present
    pub fn contains(&self, code: i32) -> bool {
        self.entries.contains_key(&code)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(code, name)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (i32, &str)> {
        self.entries.iter().map(|(code, name)| (*code, name.as_str()))
    }
}
