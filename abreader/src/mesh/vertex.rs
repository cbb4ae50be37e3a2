//! Vertex layout and attribute extraction

use super::types::{ChannelInfo, StreamInfo, VertexAttribute, VertexData};
use crate::error::{BinaryError, Result};
use byteorder::{ByteOrder as _, LittleEndian};

/// Channel holding positions
pub const POSITION_CHANNEL: usize = 0;
/// Channel holding the first UV set
pub const UV0_CHANNEL: usize = 4;

/// Numeric format of a vertex channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    Float,
    Float16,
    UNorm8,
    SNorm8,
    UNorm16,
    SNorm16,
    UInt8,
    SInt8,
    UInt16,
    SInt16,
    UInt32,
    SInt32,
}

impl VertexFormat {
    /// Map a stored format code
    pub fn from_code(code: u8) -> Option<Self> {
        use VertexFormat::*;
        const ALL: [VertexFormat; 12] = [
            Float, Float16, UNorm8, SNorm8, UNorm16, SNorm16, UInt8, SInt8, UInt16, SInt16,
            UInt32, SInt32,
        ];
        ALL.get(code as usize).copied()
    }

    /// Bytes per component
    pub fn size(&self) -> u32 {
        match self {
            VertexFormat::Float | VertexFormat::UInt32 | VertexFormat::SInt32 => 4,
            VertexFormat::Float16
            | VertexFormat::UNorm16
            | VertexFormat::SNorm16
            | VertexFormat::UInt16
            | VertexFormat::SInt16 => 2,
            VertexFormat::UNorm8 | VertexFormat::SNorm8 | VertexFormat::UInt8 | VertexFormat::SInt8 => 1,
        }
    }
}

fn channel_format(channel: &ChannelInfo, index: usize) -> Result<VertexFormat> {
    VertexFormat::from_code(channel.format).ok_or_else(|| {
        BinaryError::invalid_format(
            "vertex format",
            0,
            format!("channel {} has unknown format {}", index, channel.format),
        )
    })
}

/// Derive stream layouts from the channel table
///
/// Streams are packed back to back, each starting on a 16-byte boundary.
pub fn derive_streams(channels: &[ChannelInfo], vertex_count: u32) -> Result<Vec<StreamInfo>> {
    let stream_count = channels.iter().map(|c| c.stream as usize + 1).max().unwrap_or(0);
    let mut streams = Vec::with_capacity(stream_count);
    let mut offset = 0u64;

    for s in 0..stream_count {
        let mut stream = StreamInfo {
            offset: u32::try_from(offset).map_err(|_| {
                BinaryError::invalid_format("vertex streams", 0, "stream offset overflows")
            })?,
            ..Default::default()
        };
        for (i, channel) in channels.iter().enumerate() {
            if channel.stream as usize == s && channel.dimension > 0 {
                if i < 32 {
                    stream.channel_mask |= 1 << i;
                }
                stream.stride += channel.dimension as u32 * channel_format(channel, i)?.size();
            }
        }
        offset += vertex_count as u64 * stream.stride as u64;
        offset = offset.div_ceil(16) * 16;
        streams.push(stream);
    }
    Ok(streams)
}

/// Gather one float channel into a per-vertex attribute
pub fn read_channel(vertex_data: &VertexData, index: usize) -> Result<VertexAttribute> {
    let channel = &vertex_data.channels[index];
    let format = channel_format(channel, index)?;
    if format != VertexFormat::Float {
        return Err(BinaryError::unsupported(format!(
            "vertex channel {} in {:?} format",
            index, format
        )));
    }
    let stream = vertex_data.streams.get(channel.stream as usize).ok_or_else(|| {
        BinaryError::invalid_format(
            "vertex channel",
            0,
            format!("channel {} refers to missing stream {}", index, channel.stream),
        )
    })?;

    let dim = channel.dimension as usize;
    let count = vertex_data.vertex_count as usize;
    let data = &vertex_data.data;
    let mut values = Vec::with_capacity(count.saturating_mul(dim).min(data.len() / 4));
    for v in 0..count {
        let base = stream.offset as usize + channel.offset as usize + stream.stride as usize * v;
        for d in 0..dim {
            let start = base + d * 4;
            let bytes = data.get(start..start + 4).ok_or_else(|| {
                BinaryError::not_enough_data(start + 4, data.len(), start as u64)
            })?;
            values.push(LittleEndian::read_f32(bytes));
        }
    }

    Ok(VertexAttribute {
        dimension: channel.dimension,
        values,
    })
}

/// Decoded positions and first UV set
#[derive(Debug, Default)]
pub struct Attributes {
    pub vertices: VertexAttribute,
    pub uv0: VertexAttribute,
}

/// Materialize every live channel
///
/// Only positions and the first UV set are expected; any other live channel
/// is rejected.
pub fn materialize(vertex_data: &VertexData) -> Result<Attributes> {
    let mut attributes = Attributes::default();
    for (index, channel) in vertex_data.channels.iter().enumerate() {
        if channel.dimension == 0 {
            continue;
        }
        let attribute = read_channel(vertex_data, index)?;
        match index {
            POSITION_CHANNEL => attributes.vertices = attribute,
            UV0_CHANNEL => attributes.uv0 = attribute,
            _ => {
                return Err(BinaryError::invalid_format(
                    "vertex channel",
                    0,
                    format!("unexpected live channel {}", index),
                ));
            }
        }
    }
    Ok(attributes)
}
