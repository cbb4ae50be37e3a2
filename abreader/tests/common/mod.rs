//! Synthetic bundle builders shared by the integration tests
//!
//! Everything here writes the same layouts the parsers read: a UnityFS
//! container around version 22 serialized files, plus Texture2D and Mesh
//! payloads.

#![allow(dead_code)]

pub const TEXTURE_2D: i32 = 28;
pub const MESH: i32 = 43;
pub const GAME_OBJECT: i32 = 1;

/// Block compression flags
pub const NONE: u16 = 0;
pub const LZMA: u16 = 1;
pub const LZ4: u16 = 2;

pub fn align4(out: &mut Vec<u8>) {
    while out.len() % 4 != 0 {
        out.push(0);
    }
}

pub fn aligned_string(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(&(s.len() as i32).to_le_bytes());
    out.extend_from_slice(s.as_bytes());
    align4(out);
}

fn byte_array(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(&(bytes.len() as i32).to_le_bytes());
    out.extend_from_slice(bytes);
    align4(out);
}

fn floats(out: &mut Vec<u8>, values: &[f32]) {
    for value in values {
        out.extend_from_slice(&value.to_le_bytes());
    }
}

/// Where a texture's pixels live
pub enum Pixels<'a> {
    Inline(&'a [u8]),
    Streamed { offset: u64, size: u32, path: &'a str },
}

/// Texture2D payload
pub fn texture_payload(name: &str, width: i32, height: i32, format: i32, pixels: Pixels) -> Vec<u8> {
    let mut out = Vec::new();
    aligned_string(&mut out, name);
    out.extend_from_slice(&(-1i32).to_le_bytes());
    out.extend_from_slice(&[0, 0]);
    align4(&mut out);
    for value in [width, height, 0, 0, format, 1] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out.extend_from_slice(&[0, 0, 0, 0]);
    align4(&mut out);
    for value in [0i32, 1, 2] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out.extend_from_slice(&1i32.to_le_bytes());
    out.extend_from_slice(&1i32.to_le_bytes());
    out.extend_from_slice(&0f32.to_le_bytes());
    for value in [0i32, 0, 0, 6, 1, 0] {
        out.extend_from_slice(&value.to_le_bytes());
    }

    match pixels {
        Pixels::Inline(data) => {
            byte_array(&mut out, data);
            out.extend_from_slice(&0u64.to_le_bytes());
            out.extend_from_slice(&0u32.to_le_bytes());
            aligned_string(&mut out, "");
        }
        Pixels::Streamed { offset, size, path } => {
            byte_array(&mut out, &[]);
            out.extend_from_slice(&offset.to_le_bytes());
            out.extend_from_slice(&size.to_le_bytes());
            aligned_string(&mut out, path);
        }
    }
    out
}

/// Static triangle mesh with float3 positions and an optional float2 UV set
pub struct MeshLayout<'a> {
    pub name: &'a str,
    pub positions: &'a [[f32; 3]],
    pub uv0: Option<&'a [[f32; 2]]>,
    pub index_buffer: &'a [u16],
    /// (first_byte, index_count) per submesh
    pub sub_meshes: &'a [(u32, u32)],
}

/// Mesh payload
pub fn mesh_payload(layout: &MeshLayout) -> Vec<u8> {
    let mut out = Vec::new();
    aligned_string(&mut out, layout.name);

    out.extend_from_slice(&(layout.sub_meshes.len() as i32).to_le_bytes());
    for &(first_byte, index_count) in layout.sub_meshes {
        out.extend_from_slice(&first_byte.to_le_bytes());
        out.extend_from_slice(&index_count.to_le_bytes());
        out.extend_from_slice(&0i32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&(layout.positions.len() as u32).to_le_bytes());
        floats(&mut out, &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    }

    // Blend shapes, bind poses, bone hashes
    for _ in 0..6 {
        out.extend_from_slice(&0i32.to_le_bytes());
    }
    out.extend_from_slice(&0u32.to_le_bytes());
    // Bone bounds, variable bone weights
    for _ in 0..2 {
        out.extend_from_slice(&0i32.to_le_bytes());
    }

    out.extend_from_slice(&[0, 1, 1, 1]);
    out.extend_from_slice(&0i32.to_le_bytes());
    let indices: Vec<u8> = layout.index_buffer.iter().flat_map(|i| i.to_le_bytes()).collect();
    byte_array(&mut out, &indices);

    let vertex_count = layout.positions.len();
    let stride = if layout.uv0.is_some() { 20 } else { 12 };
    out.extend_from_slice(&(vertex_count as u32).to_le_bytes());
    out.extend_from_slice(&14i32.to_le_bytes());
    for channel in 0..14u8 {
        match (channel, layout.uv0) {
            (0, _) => out.extend_from_slice(&[0, 0, 0, 3]),
            (4, Some(_)) => out.extend_from_slice(&[0, 12, 0, 2]),
            _ => out.extend_from_slice(&[0, 0, 0, 0]),
        }
    }
    let mut vertices = Vec::with_capacity(vertex_count * stride);
    for (v, position) in layout.positions.iter().enumerate() {
        floats(&mut vertices, position);
        if let Some(uv0) = layout.uv0 {
            floats(&mut vertices, &uv0[v]);
        }
    }
    byte_array(&mut out, &vertices);

    // Compressed mesh: float, float, float, float, int, int, int, float, int, int
    for packed_float in [true, true, true, true, false, false, false, true, false, false] {
        out.extend_from_slice(&0u32.to_le_bytes());
        if packed_float {
            floats(&mut out, &[0.0, 0.0]);
        }
        byte_array(&mut out, &[]);
        out.push(0);
        align4(&mut out);
    }
    out.extend_from_slice(&0u32.to_le_bytes());

    floats(&mut out, &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    out.extend_from_slice(&0i32.to_le_bytes());
    byte_array(&mut out, &[]);
    byte_array(&mut out, &[]);
    floats(&mut out, &[1.0, 1.0]);

    out.extend_from_slice(&0u64.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    aligned_string(&mut out, "");
    out
}

/// Version 22 serialized file, optionally carrying type trees
#[derive(Default)]
pub struct SerializedFileBuilder {
    class_ids: Vec<i32>,
    objects: Vec<(i64, i32, Vec<u8>)>,
    type_trees: bool,
}

/// Common-string references
pub const COMMON_BASE: u32 = 0x8000_0000 | 55;
pub const COMMON_STRING: u32 = 0x8000_0000 | 840;
pub const COMMON_M_NAME: u32 = 0x8000_0000 | 427;

fn type_tree_node(out: &mut Vec<u8>, level: u8, type_ref: u32, name_ref: u32, index: i32) {
    out.extend_from_slice(&1u16.to_le_bytes());
    out.push(level);
    out.push(0);
    out.extend_from_slice(&type_ref.to_le_bytes());
    out.extend_from_slice(&name_ref.to_le_bytes());
    out.extend_from_slice(&(-1i32).to_le_bytes());
    out.extend_from_slice(&index.to_le_bytes());
    out.extend_from_slice(&0i32.to_le_bytes());
    out.extend_from_slice(&0u64.to_le_bytes());
}

/// Two-node tree: a root named after the class from the local buffer and an
/// `m_Name` string child from the common table, then one dependency
fn type_tree_blob(out: &mut Vec<u8>, class_id: i32) {
    let strings = format!("Class{}\0", class_id);
    out.extend_from_slice(&2i32.to_le_bytes());
    out.extend_from_slice(&(strings.len() as i32).to_le_bytes());
    type_tree_node(out, 0, 0, COMMON_BASE, 0);
    type_tree_node(out, 1, COMMON_STRING, COMMON_M_NAME, 1);
    out.extend_from_slice(strings.as_bytes());
    out.extend_from_slice(&1i32.to_le_bytes());
    out.extend_from_slice(&class_id.to_le_bytes());
}

impl SerializedFileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object(mut self, path_id: i64, class_id: i32, payload: Vec<u8>) -> Self {
        if !self.class_ids.contains(&class_id) {
            self.class_ids.push(class_id);
        }
        self.objects.push((path_id, class_id, payload));
        self
    }

    pub fn with_type_trees(mut self) -> Self {
        self.type_trees = true;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        const HEADER_LEN: usize = 48;

        let mut data = Vec::new();
        let mut starts = Vec::with_capacity(self.objects.len());
        for (_, _, payload) in &self.objects {
            while data.len() % 8 != 0 {
                data.push(0);
            }
            starts.push(data.len());
            data.extend_from_slice(payload);
        }

        let mut meta = Vec::new();
        meta.extend_from_slice(b"2021.3.0f1\0");
        meta.extend_from_slice(&13i32.to_le_bytes());
        meta.push(self.type_trees as u8);
        meta.extend_from_slice(&(self.class_ids.len() as i32).to_le_bytes());
        for class_id in &self.class_ids {
            meta.extend_from_slice(&class_id.to_le_bytes());
            meta.push(0);
            meta.extend_from_slice(&(-1i16).to_le_bytes());
            meta.extend_from_slice(&[0x5A; 16]);
            if self.type_trees {
                type_tree_blob(&mut meta, *class_id);
            }
        }

        meta.extend_from_slice(&(self.objects.len() as i32).to_le_bytes());
        for ((path_id, class_id, payload), start) in self.objects.iter().zip(&starts) {
            while (HEADER_LEN + meta.len()) % 4 != 0 {
                meta.push(0);
            }
            let type_id = self
                .class_ids
                .iter()
                .position(|c| c == class_id)
                .unwrap_or_default() as i32;
            meta.extend_from_slice(&path_id.to_le_bytes());
            meta.extend_from_slice(&(*start as i64).to_le_bytes());
            meta.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            meta.extend_from_slice(&type_id.to_le_bytes());
        }
        // Scripts, externals, ref types
        for _ in 0..3 {
            meta.extend_from_slice(&0i32.to_le_bytes());
        }
        meta.push(0);

        let data_offset = (HEADER_LEN + meta.len()).div_ceil(16) * 16;
        let file_size = data_offset + data.len();

        let mut out = Vec::with_capacity(file_size);
        out.extend_from_slice(&0u32.to_be_bytes());
        out.extend_from_slice(&0u32.to_be_bytes());
        out.extend_from_slice(&22u32.to_be_bytes());
        out.extend_from_slice(&0u32.to_be_bytes());
        out.extend_from_slice(&[0, 0, 0, 0]);
        out.extend_from_slice(&(meta.len() as u32).to_be_bytes());
        out.extend_from_slice(&(file_size as i64).to_be_bytes());
        out.extend_from_slice(&(data_offset as i64).to_be_bytes());
        out.extend_from_slice(&0u64.to_be_bytes());
        out.extend(meta);
        out.resize(data_offset, 0);
        out.extend(data);
        out
    }
}

/// UnityFS container
pub struct BundleBuilder {
    pub version: u32,
    pub table_compression: u16,
    pub block_compression: u16,
    pub block_size: usize,
    nodes: Vec<(String, Vec<u8>)>,
}

impl Default for BundleBuilder {
    fn default() -> Self {
        Self {
            version: 7,
            table_compression: LZ4,
            block_compression: LZ4,
            block_size: 128,
            nodes: Vec::new(),
        }
    }
}

fn compress(data: &[u8], flags: u16) -> Vec<u8> {
    match flags {
        LZ4 => lz4_flex::block::compress(data),
        _ => data.to_vec(),
    }
}

impl BundleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, path: &str, data: Vec<u8>) -> Self {
        self.nodes.push((path.to_string(), data));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let stream: Vec<u8> = self.nodes.iter().flat_map(|(_, data)| data.clone()).collect();

        let mut blocks = Vec::new();
        let mut block_bytes = Vec::new();
        for chunk in stream.chunks(self.block_size.max(1)) {
            let packed = compress(chunk, self.block_compression);
            blocks.push((chunk.len() as u32, packed.len() as u32));
            block_bytes.extend(packed);
        }

        let mut table = vec![0u8; 16];
        table.extend_from_slice(&(blocks.len() as i32).to_be_bytes());
        for (uncompressed, compressed) in &blocks {
            table.extend_from_slice(&uncompressed.to_be_bytes());
            table.extend_from_slice(&compressed.to_be_bytes());
            table.extend_from_slice(&self.block_compression.to_be_bytes());
        }
        table.extend_from_slice(&(self.nodes.len() as i32).to_be_bytes());
        let mut offset = 0i64;
        for (path, data) in &self.nodes {
            table.extend_from_slice(&offset.to_be_bytes());
            table.extend_from_slice(&(data.len() as i64).to_be_bytes());
            table.extend_from_slice(&4u32.to_be_bytes());
            table.extend_from_slice(path.as_bytes());
            table.push(0);
            offset += data.len() as i64;
        }
        let packed_table = compress(&table, self.table_compression);

        let mut out = Vec::new();
        out.extend_from_slice(b"UnityFS\0");
        out.extend_from_slice(&self.version.to_be_bytes());
        out.extend_from_slice(b"5.x.x\0");
        out.extend_from_slice(b"2021.3.0f1\0");
        let size_at = out.len();
        out.extend_from_slice(&0i64.to_be_bytes());
        out.extend_from_slice(&(packed_table.len() as u32).to_be_bytes());
        out.extend_from_slice(&(table.len() as u32).to_be_bytes());
        out.extend_from_slice(&(0x40 | self.table_compression as u32).to_be_bytes());
        if self.version >= 7 {
            while out.len() % 16 != 0 {
                out.push(0);
            }
        }
        out.extend(packed_table);
        out.extend(block_bytes);

        let size = out.len() as i64;
        out[size_at..size_at + 8].copy_from_slice(&size.to_be_bytes());
        out
    }
}
