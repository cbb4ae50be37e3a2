//! Mesh processing
//!
//! - `types` - Mesh record, submeshes, vertex layout
//! - `reader` - Mesh record reader
//! - `vertex` - Vertex formats, stream layout, channel extraction
//! - `packed` - Packed vectors and the compressed-mesh block

pub mod packed;
pub mod reader;
pub mod types;
pub mod vertex;

pub use reader::MeshReader;
pub use types::{
    Aabb, ChannelInfo, MeshRecord, PackedFloatVector, PackedIntVector, StreamInfo, SubMesh,
    VertexAttribute, VertexData,
};
pub use vertex::VertexFormat;
