//! Decode session
//!
//! A session owns everything sliced out of one bundle: the parsed serialized
//! files and the resource blobs their textures stream from. Objects are
//! decoded on demand, and one object's failure never affects another.

use crate::bundle::{AssetBundle, BundleHeader, BundleParser, NodeDescriptor, ResourceBlobs};
use crate::error::{BinaryError, Result};
use crate::mesh::{MeshReader, MeshRecord};
use crate::options::DecodeOptions;
use crate::serialized::{ObjectEntry, SerializedFile, SerializedFileParser};
use crate::texture::{PixelBuffer, TextureReader, TextureRecord, decode_texture};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument, warn};

/// Class name routed to the texture reader
pub const TEXTURE_CLASS: &str = "Texture2D";
/// Class name routed to the mesh reader
pub const MESH_CLASS: &str = "Mesh";

/// A decoded object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DecodedObject {
    Texture(TextureRecord),
    Mesh(MeshRecord),
}

impl DecodedObject {
    /// Object name
    pub fn name(&self) -> &str {
        match self {
            DecodedObject::Texture(texture) => &texture.name,
            DecodedObject::Mesh(mesh) => &mesh.name,
        }
    }
}

/// Result of decoding one object inside [`BundleSession::decode_all`]
#[derive(Debug)]
pub struct ObjectOutcome {
    pub file_index: usize,
    pub path_id: i64,
    pub class_id: i32,
    /// `Ok(None)` for classes the decoder does not read
    pub result: Result<Option<DecodedObject>>,
}

/// Decoded view of one bundle
#[derive(Debug)]
pub struct BundleSession {
    options: DecodeOptions,
    header: BundleHeader,
    nodes: Vec<NodeDescriptor>,
    files: Vec<SerializedFile>,
    resources: ResourceBlobs,
}

impl BundleSession {
    /// Parse a bundle and the tables of every serialized file in it
    #[instrument(skip(data, options), fields(len = data.len()))]
    pub fn from_bytes(data: &[u8], options: DecodeOptions) -> Result<Self> {
        let bundle = BundleParser::parse(data)?;
        Self::from_bundle(bundle, options)
    }

    /// Read and parse a bundle file
    pub fn from_path<P: AsRef<Path>>(path: P, options: DecodeOptions) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data, options)
    }

    /// Build a session from an already parsed bundle
    pub fn from_bundle(bundle: AssetBundle, options: DecodeOptions) -> Result<Self> {
        let AssetBundle {
            header,
            nodes,
            serialized_files,
            resources,
            ..
        } = bundle;

        let mut files = Vec::with_capacity(serialized_files.len());
        for sub_file in serialized_files {
            let file = SerializedFileParser::parse(
                &sub_file.path,
                sub_file.data,
                &options.tables.common_strings,
            )?;
            debug!(
                path = %file.name,
                objects = file.objects.len(),
                "loaded serialized file"
            );
            files.push(file);
        }

        Ok(Self {
            options,
            header,
            nodes,
            files,
            resources,
        })
    }

    /// Bundle header
    pub fn header(&self) -> &BundleHeader {
        &self.header
    }

    /// Directory nodes
    pub fn nodes(&self) -> &[NodeDescriptor] {
        &self.nodes
    }

    /// Parsed serialized files, in node order
    pub fn files(&self) -> &[SerializedFile] {
        &self.files
    }

    /// Resource blobs
    pub fn resources(&self) -> &ResourceBlobs {
        &self.resources
    }

    /// Options in use
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Every object with its file index and class name
    pub fn objects(&self) -> impl Iterator<Item = (usize, &ObjectEntry, Option<&str>)> {
        self.files.iter().enumerate().flat_map(move |(index, file)| {
            file.objects
                .iter()
                .map(move |entry| (index, entry, self.options.tables.class_name(entry.class_id)))
        })
    }

    /// Decode one object
    ///
    /// Returns `Ok(None)` for classes other than textures and meshes. A class
    /// id missing from the class table is an error.
    pub fn decode_object(
        &self,
        file_index: usize,
        entry: &ObjectEntry,
    ) -> Result<Option<DecodedObject>> {
        let file = self.files.get(file_index).ok_or_else(|| {
            BinaryError::invalid_format(
                "file index",
                0,
                format!("{} outside {} serialized files", file_index, self.files.len()),
            )
        })?;

        let tables = &self.options.tables;
        let class_name = tables.class_name(entry.class_id).ok_or_else(|| {
            BinaryError::invalid_format(
                "class id",
                entry.byte_start,
                format!("class id {} is not in the class table", entry.class_id),
            )
        })?;

        match class_name {
            TEXTURE_CLASS => {
                let mut cursor = file.object_cursor(entry)?;
                let texture = TextureReader::new(tables).read(&mut cursor)?;
                Ok(Some(DecodedObject::Texture(texture)))
            }
            MESH_CLASS => {
                let mut cursor = file.object_cursor(entry)?;
                Ok(Some(DecodedObject::Mesh(MeshReader::read(&mut cursor)?)))
            }
            _ => Ok(None),
        }
    }

    /// Decode every object, keeping failures per object
    #[instrument(skip(self))]
    pub fn decode_all(&self) -> Vec<ObjectOutcome> {
        let mut outcomes = Vec::new();
        for (file_index, file) in self.files.iter().enumerate() {
            for entry in &file.objects {
                let result = self.decode_object(file_index, entry);
                if let Err(err) = &result {
                    warn!(
                        file = %file.name,
                        path_id = entry.path_id,
                        class_id = entry.class_id,
                        error = %err,
                        "failed to decode object"
                    );
                }
                outcomes.push(ObjectOutcome {
                    file_index,
                    path_id: entry.path_id,
                    class_id: entry.class_id,
                    result,
                });
            }
        }
        outcomes
    }

    /// Decode a texture's pixels against this bundle's resource blobs
    pub fn decode_texture_pixels(&self, texture: &TextureRecord) -> Result<PixelBuffer> {
        decode_texture(texture, &self.resources, &self.options)
    }
}
