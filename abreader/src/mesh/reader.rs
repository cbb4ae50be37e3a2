//! Mesh record reader
//!
//! Reads static, uncompressed meshes with 16-bit indices. Blend shapes,
//! skinning, compressed meshes and streamed vertex data are reported as
//! unsupported rather than skipped.

use super::packed::read_empty_compressed_mesh;
use super::types::{Aabb, ChannelInfo, MeshRecord, SubMesh, VertexData};
use super::vertex::{derive_streams, materialize};
use crate::error::{BinaryError, Result};
use crate::reader::ByteCursor;
use tracing::trace;

/// Index format code for 16-bit indices
pub const INDEX_FORMAT_UINT16: i32 = 0;
/// Index format code for 32-bit indices
pub const INDEX_FORMAT_UINT32: i32 = 1;
/// Topology code for triangle lists
pub const TOPOLOGY_TRIANGLES: i32 = 0;

/// Mesh reader
pub struct MeshReader;

impl MeshReader {
    /// Read a Mesh record and build its vertex and index lists
    pub fn read(cursor: &mut ByteCursor) -> Result<MeshRecord> {
        let mut mesh = MeshRecord {
            name: cursor.read_aligned_string()?,
            ..Default::default()
        };

        mesh.sub_meshes = Self::read_sub_meshes(cursor)?;
        Self::read_shapes(cursor)?;
        mesh.root_bone_name_hash = Self::read_bones(cursor)?;

        mesh.mesh_compression = cursor.read_u8()?;
        mesh.is_readable = cursor.read_bool()?;
        mesh.keep_vertices = cursor.read_bool()?;
        mesh.keep_indices = cursor.read_bool()?;
        cursor.align();

        mesh.index_format = Self::read_index_format(cursor)?;
        mesh.index_buffer = Self::read_index_buffer(cursor)?;
        mesh.vertex_data = Self::read_vertex_data(cursor)?;
        trace!(
            name = %mesh.name,
            vertices = mesh.vertex_data.vertex_count,
            indices = mesh.index_buffer.len(),
            "mesh buffers"
        );

        read_empty_compressed_mesh(cursor)?;

        mesh.local_aabb = read_aabb(cursor)?;
        mesh.mesh_usage_flags = cursor.read_i32()?;
        mesh.baked_convex_collision_mesh = cursor.read_byte_array("convex collision size")?;
        cursor.align();
        mesh.baked_triangle_collision_mesh = cursor.read_byte_array("triangle collision size")?;
        cursor.align();
        mesh.mesh_metrics = [cursor.read_f32()?, cursor.read_f32()?];
        cursor.align();
        Self::read_stream_data(cursor)?;

        let attributes = materialize(&mesh.vertex_data)?;
        mesh.vertices = attributes.vertices;
        mesh.uv0 = attributes.uv0;
        mesh.indices = gather_indices(&mesh.sub_meshes, &mesh.index_buffer)?;
        mesh.validate()?;
        Ok(mesh)
    }

    fn read_sub_meshes(cursor: &mut ByteCursor) -> Result<Vec<SubMesh>> {
        let count = cursor.read_count("submesh count")?;
        let mut sub_meshes = Vec::with_capacity(count.min(cursor.remaining() / 48));
        for _ in 0..count {
            let first_byte = cursor.read_u32()?;
            let index_count = cursor.read_u32()?;
            let topology_offset = cursor.position();
            let topology = cursor.read_i32()?;
            if topology != TOPOLOGY_TRIANGLES {
                return Err(BinaryError::invalid_format(
                    "topology",
                    topology_offset,
                    format!("topology {} is not a triangle list", topology),
                ));
            }
            sub_meshes.push(SubMesh {
                first_byte,
                index_count,
                topology,
                base_vertex: cursor.read_u32()?,
                first_vertex: cursor.read_u32()?,
                vertex_count: cursor.read_u32()?,
                local_aabb: read_aabb(cursor)?,
            });
        }
        Ok(sub_meshes)
    }

    fn read_shapes(cursor: &mut ByteCursor) -> Result<()> {
        for field in [
            "blend shape vertices",
            "blend shapes",
            "blend shape channels",
            "blend shape weights",
        ] {
            expect_zero(cursor, field, "blend shapes")?;
        }
        Ok(())
    }

    fn read_bones(cursor: &mut ByteCursor) -> Result<u32> {
        expect_zero(cursor, "bind poses", "skinned mesh")?;
        expect_zero(cursor, "bone name hashes", "skinned mesh")?;
        let root_bone_name_hash = cursor.read_u32()?;
        expect_zero(cursor, "bone bounds", "skinned mesh")?;
        expect_zero(cursor, "variable bone count weights", "skinned mesh")?;
        Ok(root_bone_name_hash)
    }

    fn read_index_format(cursor: &mut ByteCursor) -> Result<i32> {
        let offset = cursor.position();
        match cursor.read_i32()? {
            INDEX_FORMAT_UINT16 => Ok(INDEX_FORMAT_UINT16),
            INDEX_FORMAT_UINT32 => Err(BinaryError::unsupported("32-bit mesh indices")),
            other => Err(BinaryError::invalid_format(
                "index format",
                offset,
                format!("unknown index format {}", other),
            )),
        }
    }

    fn read_index_buffer(cursor: &mut ByteCursor) -> Result<Vec<u16>> {
        let offset = cursor.position();
        let bytes = cursor.read_byte_array("index buffer size")?;
        cursor.align();
        if bytes.len() % 2 != 0 {
            return Err(BinaryError::invalid_format(
                "index buffer",
                offset,
                format!("{} bytes is not a whole number of 16-bit indices", bytes.len()),
            ));
        }
        Ok(bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect())
    }

    fn read_vertex_data(cursor: &mut ByteCursor) -> Result<VertexData> {
        let vertex_count = cursor.read_u32()?;
        let channel_count = cursor.read_count("channel count")?;
        if !cursor.has_bytes(channel_count.saturating_mul(4)) {
            return Err(BinaryError::not_enough_data(
                channel_count.saturating_mul(4),
                cursor.remaining(),
                cursor.position(),
            ));
        }

        let mut channels = Vec::with_capacity(channel_count);
        for _ in 0..channel_count {
            channels.push(ChannelInfo {
                stream: cursor.read_u8()?,
                offset: cursor.read_u8()?,
                format: cursor.read_u8()?,
                dimension: cursor.read_u8()? & 0x0F,
            });
        }

        let streams = derive_streams(&channels, vertex_count)?;
        let data = cursor.read_byte_array("vertex data size")?;
        cursor.align();

        Ok(VertexData {
            vertex_count,
            channels,
            streams,
            data,
        })
    }

    fn read_stream_data(cursor: &mut ByteCursor) -> Result<()> {
        let offset = cursor.read_u64()?;
        let size = cursor.read_u32()?;
        let path = cursor.read_aligned_string()?;
        if path.is_empty() {
            Ok(())
        } else {
            Err(BinaryError::unsupported(format!(
                "streamed mesh data ({} bytes at {} in {})",
                size, offset, path
            )))
        }
    }
}

fn read_aabb(cursor: &mut ByteCursor) -> Result<Aabb> {
    Ok(Aabb {
        center: [cursor.read_f32()?, cursor.read_f32()?, cursor.read_f32()?],
        extent: [cursor.read_f32()?, cursor.read_f32()?, cursor.read_f32()?],
    })
}

fn expect_zero(cursor: &mut ByteCursor, field: &str, feature: &str) -> Result<()> {
    let count = cursor.read_count(field)?;
    if count == 0 {
        Ok(())
    } else {
        Err(BinaryError::unsupported(format!("{} ({} {})", feature, count, field)))
    }
}

/// Gather every submesh's triangles from the index buffer
pub fn gather_indices(sub_meshes: &[SubMesh], index_buffer: &[u16]) -> Result<Vec<u16>> {
    let mut indices = Vec::new();
    for sub_mesh in sub_meshes {
        if sub_mesh.index_count % 3 != 0 {
            return Err(BinaryError::invalid_format(
                "index count",
                0,
                format!("{} indices do not form whole triangles", sub_mesh.index_count),
            ));
        }
        let start = sub_mesh.first_index();
        let end = start + sub_mesh.index_count as usize;
        let range = index_buffer.get(start..end).ok_or_else(|| {
            BinaryError::not_enough_data(end * 2, index_buffer.len() * 2, sub_mesh.first_byte as u64)
        })?;
        indices.extend_from_slice(range);
    }
    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn sub_mesh(first_byte: u32, index_count: u32) -> SubMesh {
        SubMesh {
            first_byte,
            index_count,
            ..Default::default()
        }
    }

    #[test]
    fn test_gather_indices() {
        let buffer = [9, 0, 1, 2, 2, 1, 3];
        let indices = gather_indices(&[sub_mesh(2, 3), sub_mesh(8, 3)], &buffer).unwrap();
        assert_eq!(indices, vec![0, 1, 2, 2, 1, 3]);
    }

    #[test]
    fn test_submesh_past_buffer() {
        let err = gather_indices(&[sub_mesh(4, 6)], &[0, 1, 2, 3]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Truncation);
    }

    #[test]
    fn test_partial_triangle() {
        let err = gather_indices(&[sub_mesh(0, 4)], &[0, 1, 2, 3]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
