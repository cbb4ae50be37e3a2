//! SerializedFile parser
//!
//! Reads the header, the metadata block and the type and object tables.
//! Every object's byte range is checked against the file before the file is
//! handed out, so object readers can slice without further checks.

use super::header::SerializedFileHeader;
use super::typetree::TypeTree;
use super::types::{ObjectEntry, SerializedFile, TypeEntry};
use crate::error::{BinaryError, Result};
use crate::reader::{ByteCursor, ByteOrder};
use crate::versioned::{VersionedField, read_fields};
use abreader_core::{CommonStrings, class_ids};
use tracing::{debug, instrument};

/// Metadata fields ahead of the type table
#[derive(Debug, Default)]
struct Metadata {
    unity_version: String,
    target_platform: i32,
    enable_type_tree: Option<bool>,
}

const METADATA_FIELDS: &[VersionedField<Metadata>] = &[
    VersionedField::since("unity version", 7, |c, m| {
        m.unity_version = c.read_cstring()?;
        Ok(())
    }),
    VersionedField::since("target platform", 8, |c, m| {
        m.target_platform = c.read_i32()?;
        Ok(())
    }),
    VersionedField::since("enable type tree", 13, |c, m| {
        m.enable_type_tree = Some(c.read_bool()?);
        Ok(())
    }),
];

const TYPE_FIELDS: &[VersionedField<TypeEntry>] = &[
    VersionedField::always("class id", |c, t| {
        t.class_id = c.read_i32()?;
        Ok(())
    }),
    VersionedField::since("is stripped", 16, |c, t| {
        t.is_stripped = c.read_bool()?;
        Ok(())
    }),
    VersionedField::since("script type index", 17, |c, t| {
        t.script_type_index = Some(c.read_i16()?);
        Ok(())
    }),
    // Script ids precede the hash for MonoBehaviours (negative ids before 16)
    VersionedField::between("script id", 13, 16, |c, t| {
        if t.class_id < 0 {
            t.script_id = Some(read_hash(c)?);
        }
        Ok(())
    }),
    VersionedField::since("script id", 16, |c, t| {
        if t.class_id == class_ids::MONO_BEHAVIOUR {
            t.script_id = Some(read_hash(c)?);
        }
        Ok(())
    }),
    VersionedField::since("type hash", 13, |c, t| {
        t.type_hash = Some(read_hash(c)?);
        Ok(())
    }),
];

fn read_hash(cursor: &mut ByteCursor) -> Result<[u8; 16]> {
    let mut hash = [0u8; 16];
    hash.copy_from_slice(cursor.read(16, false)?);
    Ok(hash)
}

/// Object-table row before the class id is resolved
#[derive(Debug, Default)]
struct RawObject {
    path_id: i64,
    byte_start: u64,
    byte_size: u32,
    type_id: i32,
    class_id: Option<u16>,
}

const OBJECT_FIELDS: &[VersionedField<RawObject>] = &[
    VersionedField::between("path id", 0, 14, |c, o| {
        o.path_id = c.read_i32()? as i64;
        Ok(())
    }),
    VersionedField::since("path id", 14, |c, o| {
        c.align();
        o.path_id = c.read_i64()?;
        Ok(())
    }),
    VersionedField::between("byte start", 0, 22, |c, o| {
        o.byte_start = c.read_u32()? as u64;
        Ok(())
    }),
    VersionedField::since("byte start", 22, |c, o| {
        let offset = c.position();
        let value = c.read_i64()?;
        o.byte_start = u64::try_from(value).map_err(|_| {
            BinaryError::invalid_format("byte start", offset, format!("negative value {}", value))
        })?;
        Ok(())
    }),
    VersionedField::always("byte size", |c, o| {
        o.byte_size = c.read_u32()?;
        Ok(())
    }),
    VersionedField::always("type id", |c, o| {
        o.type_id = c.read_i32()?;
        Ok(())
    }),
    VersionedField::between("class id", 0, 16, |c, o| {
        o.class_id = Some(c.read_u16()?);
        Ok(())
    }),
    VersionedField::between("is destroyed", 0, 11, |c, _| {
        c.read_u16()?;
        Ok(())
    }),
    VersionedField::between("script type index", 11, 17, |c, _| {
        c.read_i16()?;
        Ok(())
    }),
    VersionedField::between("stripped", 15, 17, |c, _| {
        c.read_u8()?;
        Ok(())
    }),
];

/// SerializedFile parser
pub struct SerializedFileParser;

impl SerializedFileParser {
    /// Parse a serialized file, taking ownership of its bytes
    #[instrument(skip(data, common_strings), fields(len = data.len()))]
    pub fn parse(
        name: &str,
        data: Vec<u8>,
        common_strings: &CommonStrings,
    ) -> Result<SerializedFile> {
        let mut cursor = ByteCursor::new(&data, ByteOrder::Big);
        let header = SerializedFileHeader::from_cursor(&mut cursor)?;
        let version = header.version;
        debug!(version, data_offset = header.data_offset, "serialized file header");

        cursor.set_byte_order(ByteOrder::Little);

        let mut metadata = Metadata::default();
        read_fields(METADATA_FIELDS, version, &mut cursor, &mut metadata)?;
        // Type trees are always present before the flag existed
        let enable_type_tree = metadata.enable_type_tree.unwrap_or(true);

        let type_count = cursor.read_count("type count")?;
        let mut types = Vec::with_capacity(type_count.min(cursor.remaining()));
        for _ in 0..type_count {
            types.push(Self::read_type(
                &mut cursor,
                version,
                enable_type_tree,
                common_strings,
            )?);
        }

        let big_id_enabled = if (7..14).contains(&version) {
            cursor.read_bool()?
        } else {
            false
        };

        let object_count = cursor.read_count("object count")?;
        let mut objects = Vec::with_capacity(object_count.min(cursor.remaining()));
        for _ in 0..object_count {
            objects.push(Self::read_object(&mut cursor, &header, &types)?);
        }

        if version >= 11 {
            Self::expect_empty(&mut cursor, "script type")?;
        }
        Self::expect_empty(&mut cursor, "external reference")?;
        if version >= 20 {
            Self::expect_empty(&mut cursor, "reference type")?;
        }

        let user_information = if version >= 5 {
            cursor.read_cstring()?
        } else {
            String::new()
        };

        for object in &objects {
            Self::check_object_bounds(object, data.len())?;
        }

        debug!(
            types = types.len(),
            objects = objects.len(),
            unity_version = %metadata.unity_version,
            "parsed serialized file"
        );

        Ok(SerializedFile {
            name: name.to_string(),
            header,
            unity_version: metadata.unity_version,
            target_platform: metadata.target_platform,
            enable_type_tree,
            big_id_enabled,
            types,
            objects,
            user_information,
            data,
        })
    }

    fn read_type(
        cursor: &mut ByteCursor,
        version: u32,
        enable_type_tree: bool,
        common_strings: &CommonStrings,
    ) -> Result<TypeEntry> {
        let mut entry = TypeEntry::default();
        read_fields(TYPE_FIELDS, version, cursor, &mut entry)?;

        if enable_type_tree {
            entry.type_tree = Some(TypeTree::from_cursor(cursor, version, common_strings)?);
            if version >= 21 {
                let count = cursor.read_count("type dependency count")?;
                if !cursor.has_bytes(count.saturating_mul(4)) {
                    return Err(BinaryError::not_enough_data(
                        count.saturating_mul(4),
                        cursor.remaining(),
                        cursor.position(),
                    ));
                }
                entry.type_dependencies = (0..count)
                    .map(|_| cursor.read_i32())
                    .collect::<Result<_>>()?;
            }
        }

        Ok(entry)
    }

    fn read_object(
        cursor: &mut ByteCursor,
        header: &SerializedFileHeader,
        types: &[TypeEntry],
    ) -> Result<ObjectEntry> {
        let offset = cursor.position();
        let mut raw = RawObject::default();
        read_fields(OBJECT_FIELDS, header.version, cursor, &mut raw)?;

        let class_id = match raw.class_id {
            Some(class_id) => class_id as i32,
            None => usize::try_from(raw.type_id)
                .ok()
                .and_then(|index| types.get(index))
                .map(|t| t.class_id)
                .ok_or_else(|| {
                    BinaryError::invalid_format(
                        "type id",
                        offset,
                        format!("type index {} outside a table of {}", raw.type_id, types.len()),
                    )
                })?,
        };

        let byte_start = raw.byte_start.checked_add(header.data_offset).ok_or_else(|| {
            BinaryError::invalid_format("byte start", offset, "object offset overflows")
        })?;

        Ok(ObjectEntry {
            path_id: raw.path_id,
            byte_start,
            byte_size: raw.byte_size,
            type_id: raw.type_id,
            class_id,
        })
    }

    fn expect_empty(cursor: &mut ByteCursor, what: &str) -> Result<()> {
        let count = cursor.read_count(what)?;
        if count == 0 {
            Ok(())
        } else {
            Err(BinaryError::unsupported(format!("{} {} entries", count, what)))
        }
    }

    fn check_object_bounds(object: &ObjectEntry, len: usize) -> Result<()> {
        match object.byte_end() {
            Some(end) if end <= len as u64 => Ok(()),
            end => Err(BinaryError::not_enough_data(
                end.unwrap_or(u64::MAX).min(usize::MAX as u64) as usize,
                len,
                object.byte_start,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    /// Build a version 22 file with one Texture2D type and the given objects
    fn build_file(objects: &[(i64, u64, u32, i32)], payload_len: usize, tail: &[i32]) -> Vec<u8> {
        let mut meta = Vec::new();
        meta.extend_from_slice(b"2021.3.0f1\0");
        meta.extend_from_slice(&13i32.to_le_bytes());
        meta.push(0); // no type trees
        meta.extend_from_slice(&1i32.to_le_bytes());
        meta.extend_from_slice(&28i32.to_le_bytes());
        meta.push(0);
        meta.extend_from_slice(&(-1i16).to_le_bytes());
        meta.extend_from_slice(&[0xAB; 16]);
        meta.extend_from_slice(&(objects.len() as i32).to_le_bytes());
        for &(path_id, start, size, type_id) in objects {
            while (48 + meta.len()) % 4 != 0 {
                meta.push(0);
            }
            meta.extend_from_slice(&path_id.to_le_bytes());
            meta.extend_from_slice(&(start as i64).to_le_bytes());
            meta.extend_from_slice(&size.to_le_bytes());
            meta.extend_from_slice(&type_id.to_le_bytes());
        }
        for &count in tail {
            meta.extend_from_slice(&count.to_le_bytes());
        }
        meta.push(0); // user information

        let data_offset = (48 + meta.len()).div_ceil(16) * 16;
        let file_size = data_offset + payload_len;

        let mut out = Vec::new();
        out.extend_from_slice(&(meta.len() as u32).to_be_bytes());
        out.extend_from_slice(&0u32.to_be_bytes());
        out.extend_from_slice(&22u32.to_be_bytes());
        out.extend_from_slice(&0u32.to_be_bytes());
        out.extend_from_slice(&[0, 0, 0, 0]);
        out.extend_from_slice(&(meta.len() as u32).to_be_bytes());
        out.extend_from_slice(&(file_size as i64).to_be_bytes());
        out.extend_from_slice(&(data_offset as i64).to_be_bytes());
        out.extend_from_slice(&0u64.to_be_bytes());
        out.extend(meta);
        out.resize(file_size, 0);
        out
    }

    #[test]
    fn test_parse_objects() {
        let data = build_file(&[(1, 0, 8, 0), (2, 8, 4, 0)], 12, &[0, 0, 0]);
        let file = SerializedFileParser::parse("CAB-a", data, &CommonStrings::builtin()).unwrap();

        assert_eq!(file.version(), 22);
        assert_eq!(file.unity_version, "2021.3.0f1");
        assert_eq!(file.target_platform, 13);
        assert!(!file.enable_type_tree);
        assert_eq!(file.types.len(), 1);
        assert_eq!(file.types[0].type_hash, Some([0xAB; 16]));
        assert_eq!(file.objects.len(), 2);
        assert_eq!(file.objects[1].path_id, 2);
        assert_eq!(file.objects[1].class_id, 28);
        assert_eq!(
            file.objects[1].byte_start,
            file.header.data_offset + 8
        );
    }

    #[test]
    fn test_object_past_end_is_truncation() {
        let data = build_file(&[(1, 0, 64, 0)], 12, &[0, 0, 0]);
        let err = SerializedFileParser::parse("CAB-a", data, &CommonStrings::builtin()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Truncation);
    }

    #[test]
    fn test_external_references_unsupported() {
        let data = build_file(&[(1, 0, 4, 0)], 4, &[0, 1, 0]);
        let err = SerializedFileParser::parse("CAB-a", data, &CommonStrings::builtin()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn test_big_endian_file_rejected() {
        let mut data = build_file(&[], 0, &[0, 0, 0]);
        data[16] = 1;
        let err = SerializedFileParser::parse("CAB-a", data, &CommonStrings::builtin()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_type_index_out_of_range() {
        let data = build_file(&[(1, 0, 4, 5)], 4, &[0, 0, 0]);
        let err = SerializedFileParser::parse("CAB-a", data, &CommonStrings::builtin()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
