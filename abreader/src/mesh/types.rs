//! Mesh type definitions

use crate::error::{BinaryError, Result};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: [f32; 3],
    pub extent: [f32; 3],
}

impl Aabb {
    /// Create a new AABB
    pub fn new(center: [f32; 3], extent: [f32; 3]) -> Self {
        Self { center, extent }
    }

    /// Get minimum point
    pub fn min(&self) -> [f32; 3] {
        std::array::from_fn(|i| self.center[i] - self.extent[i])
    }

    /// Get maximum point
    pub fn max(&self) -> [f32; 3] {
        std::array::from_fn(|i| self.center[i] + self.extent[i])
    }
}

/// Index range of one material section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubMesh {
    pub first_byte: u32,
    pub index_count: u32,
    pub topology: i32,
    pub base_vertex: u32,
    pub first_vertex: u32,
    pub vertex_count: u32,
    pub local_aabb: Aabb,
}

impl SubMesh {
    /// First entry in the 16-bit index buffer
    pub fn first_index(&self) -> usize {
        self.first_byte as usize / 2
    }
}

/// Vertex channel layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub stream: u8,
    pub offset: u8,
    pub format: u8,
    /// Component count (low nibble of the stored byte)
    pub dimension: u8,
}

/// Derived vertex stream layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamInfo {
    pub channel_mask: u32,
    pub offset: u32,
    pub stride: u32,
}

impl StreamInfo {
    /// Check if channel `index` lives in this stream
    pub fn has_channel(&self, index: usize) -> bool {
        index < 32 && self.channel_mask & (1 << index) != 0
    }
}

/// Raw vertex buffer and its layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexData {
    pub vertex_count: u32,
    pub channels: Vec<ChannelInfo>,
    pub streams: Vec<StreamInfo>,
    pub data: Vec<u8>,
}

/// Packed float vector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackedFloatVector {
    pub num_items: u32,
    pub range: f32,
    pub start: f32,
    pub data: Vec<u8>,
    pub bit_size: u8,
}

/// Packed int vector
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedIntVector {
    pub num_items: u32,
    pub data: Vec<u8>,
    pub bit_size: u8,
}

/// One decoded per-vertex attribute
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VertexAttribute {
    /// Components per vertex
    pub dimension: u8,
    /// Components of all vertices, vertex-major
    pub values: Vec<f32>,
}

impl VertexAttribute {
    /// Number of vertices
    pub fn len(&self) -> usize {
        match self.dimension {
            0 => 0,
            dim => self.values.len() / dim as usize,
        }
    }

    /// Check if the attribute holds no vertices
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Components of one vertex
    pub fn get(&self, vertex: usize) -> Option<&[f32]> {
        let dim = self.dimension as usize;
        self.values.get(vertex * dim..(vertex + 1) * dim)
    }

    /// Iterate over vertices
    pub fn iter(&self) -> impl Iterator<Item = &[f32]> {
        self.values.chunks_exact(self.dimension.max(1) as usize)
    }
}

/// Mesh object record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshRecord {
    pub name: String,
    pub sub_meshes: Vec<SubMesh>,
    pub root_bone_name_hash: u32,
    pub mesh_compression: u8,
    pub is_readable: bool,
    pub keep_vertices: bool,
    pub keep_indices: bool,
    pub index_format: i32,
    /// Raw 16-bit index buffer
    pub index_buffer: Vec<u16>,
    pub vertex_data: VertexData,
    pub local_aabb: Aabb,
    pub mesh_usage_flags: i32,
    pub baked_convex_collision_mesh: Vec<u8>,
    pub baked_triangle_collision_mesh: Vec<u8>,
    pub mesh_metrics: [f32; 2],
    /// Positions (channel 0)
    pub vertices: VertexAttribute,
    /// First UV set (channel 4)
    pub uv0: VertexAttribute,
    /// Triangle list gathered from all submeshes
    pub indices: Vec<u16>,
}

impl MeshRecord {
    /// Vertex count declared by the vertex data
    pub fn vertex_count(&self) -> usize {
        self.vertex_data.vertex_count as usize
    }

    /// Iterate over triangles
    pub fn triangles(&self) -> impl Iterator<Item = [u16; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check the triangle list against the vertex count
    pub fn validate(&self) -> Result<()> {
        if self.indices.len() % 3 != 0 {
            return Err(BinaryError::invalid_format(
                "indices",
                0,
                format!("{} indices do not form whole triangles", self.indices.len()),
            ));
        }
        let vertex_count = self.vertex_count();
        if let Some(&bad) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(BinaryError::invalid_format(
                "indices",
                0,
                format!("index {} out of range for {} vertices", bad, vertex_count),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_bounds() {
        let aabb = Aabb::new([1.0, 2.0, 3.0], [0.5, 1.0, 1.5]);
        assert_eq!(aabb.min(), [0.5, 1.0, 1.5]);
        assert_eq!(aabb.max(), [1.5, 3.0, 4.5]);
    }

    #[test]
    fn test_vertex_attribute() {
        let attr = VertexAttribute {
            dimension: 2,
            values: vec![0.0, 1.0, 2.0, 3.0],
        };
        assert_eq!(attr.len(), 2);
        assert_eq!(attr.get(1), Some(&[2.0, 3.0][..]));
        assert_eq!(attr.get(2), None);
        assert_eq!(attr.iter().count(), 2);
        assert!(VertexAttribute::default().is_empty());
    }

    #[test]
    fn test_validate() {
        let mut mesh = MeshRecord {
            indices: vec![0, 1, 2],
            ..Default::default()
        };
        mesh.vertex_data.vertex_count = 3;
        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.triangles().collect::<Vec<_>>(), vec![[0, 1, 2]]);

        mesh.indices = vec![0, 1, 3];
        assert!(mesh.validate().is_err());

        mesh.indices = vec![0, 1];
        assert!(mesh.validate().is_err());
    }
}
