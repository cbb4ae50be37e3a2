//! Packed vectors and the compressed-mesh block
//!
//! Compressed meshes are not decoded. The block is still read field by field
//! so the cursor stays in step, and any content in it is reported.

use super::types::{PackedFloatVector, PackedIntVector};
use crate::error::{BinaryError, Result};
use crate::reader::ByteCursor;

impl PackedFloatVector {
    /// Read a packed float vector
    pub fn from_cursor(cursor: &mut ByteCursor) -> Result<Self> {
        let num_items = cursor.read_u32()?;
        let range = cursor.read_f32()?;
        let start = cursor.read_f32()?;
        let data = cursor.read_byte_array("packed vector data size")?;
        cursor.align();
        let bit_size = cursor.read_u8()?;
        cursor.align();
        Ok(Self {
            num_items,
            range,
            start,
            data,
            bit_size,
        })
    }
}

impl PackedIntVector {
    /// Read a packed int vector
    pub fn from_cursor(cursor: &mut ByteCursor) -> Result<Self> {
        let num_items = cursor.read_u32()?;
        let data = cursor.read_byte_array("packed vector data size")?;
        cursor.align();
        let bit_size = cursor.read_u8()?;
        cursor.align();
        Ok(Self {
            num_items,
            data,
            bit_size,
        })
    }
}

enum Packed {
    Float,
    Int,
}

/// Compressed-mesh members in stored order
const COMPRESSED_MESH_LAYOUT: [(&str, Packed); 10] = [
    ("vertices", Packed::Float),
    ("uv", Packed::Float),
    ("normals", Packed::Float),
    ("tangents", Packed::Float),
    ("weights", Packed::Int),
    ("normal signs", Packed::Int),
    ("tangent signs", Packed::Int),
    ("float colors", Packed::Float),
    ("bone indices", Packed::Int),
    ("triangles", Packed::Int),
];

/// Read the compressed-mesh block and require it to be empty
pub fn read_empty_compressed_mesh(cursor: &mut ByteCursor) -> Result<()> {
    for (name, kind) in COMPRESSED_MESH_LAYOUT.iter() {
        let num_items = match kind {
            Packed::Float => PackedFloatVector::from_cursor(cursor)?.num_items,
            Packed::Int => PackedIntVector::from_cursor(cursor)?.num_items,
        };
        if num_items != 0 {
            return Err(BinaryError::unsupported(format!(
                "compressed mesh ({} {} items)",
                num_items, name
            )));
        }
    }

    let uv_info = cursor.read_u32()?;
    if uv_info != 0 {
        return Err(BinaryError::unsupported(format!(
            "compressed mesh (uv info {:#x})",
            uv_info
        )));
    }
    Ok(())
}
