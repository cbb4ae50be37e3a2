//! Version-gated field tables
//!
//! Serialized-file structures grow optional fields as the format version
//! rises. Each structure declares its layout as an ordered slice of
//! [`VersionedField`]s; [`read_fields`] walks the slice in order and runs
//! every reader whose version range includes the file's version. The table
//! is the single description of the wire layout.

use crate::error::Result;
use crate::reader::ByteCursor;
use tracing::trace;

/// Reads one field from the cursor into the structure under construction
pub type FieldReader<T> = fn(&mut ByteCursor<'_>, &mut T) -> Result<()>;

/// One field guarded by a format-version range
pub struct VersionedField<T> {
    /// Field name, for diagnostics
    pub name: &'static str,
    /// First version carrying the field
    pub min_version: u32,
    /// First version no longer carrying the field
    pub until_version: Option<u32>,
    /// Reader for the field
    pub read: FieldReader<T>,
}

impl<T> VersionedField<T> {
    /// Field present in every version
    pub const fn always(name: &'static str, read: FieldReader<T>) -> Self {
        Self::since(name, 0, read)
    }

    /// Field present from `min_version` on
    pub const fn since(name: &'static str, min_version: u32, read: FieldReader<T>) -> Self {
        Self {
            name,
            min_version,
            until_version: None,
            read,
        }
    }

    /// Field present in `min_version..until_version`
    pub const fn between(
        name: &'static str,
        min_version: u32,
        until_version: u32,
        read: FieldReader<T>,
    ) -> Self {
        Self {
            name,
            min_version,
            until_version: Some(until_version),
            read,
        }
    }

    /// Whether the field exists at `version`
    pub fn applies(&self, version: u32) -> bool {
        version >= self.min_version && self.until_version.is_none_or(|until| version < until)
    }
}

/// Read every field of `fields` that applies at `version`, in order
pub fn read_fields<T>(
    fields: &[VersionedField<T>],
    version: u32,
    cursor: &mut ByteCursor<'_>,
    target: &mut T,
) -> Result<()> {
    for field in fields.iter().filter(|f| f.applies(version)) {
        trace!(field = field.name, offset = cursor.position(), "reading field");
        (field.read)(cursor, target)?;
    }
    Ok(())
}
