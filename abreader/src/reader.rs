//! Byte cursor over an in-memory buffer
//!
//! Every layer of the decoder reads through [`ByteCursor`]: a forward-moving
//! position over a borrowed byte slice with fixed-width typed reads, C-string
//! and length-prefixed string reads, alignment, and the zero-delimited field
//! convention used by a few bundle header fields.

use crate::error::{BinaryError, Result};
use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io::Cursor;

/// Byte order for reading binary data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Big endian (bundle and serialized-file headers)
    Big,
    /// Little endian (object payloads)
    #[default]
    Little,
}

/// Stateful reader over an immutable byte buffer
///
/// Invariant: every successful read leaves `position() <= len()`. Reads that
/// would run past the end fail with [`BinaryError::NotEnoughData`] and leave
/// the position unchanged.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    cursor: Cursor<&'a [u8]>,
    byte_order: ByteOrder,
}

macro_rules! read_typed {
    ($(#[$doc:meta])* $name:ident, $ty:ty, $size:expr, $read:ident) => {
        $(#[$doc])*
        pub fn $name(&mut self) -> Result<$ty> {
            self.ensure($size)?;
            let value = match self.byte_order {
                ByteOrder::Big => self.cursor.$read::<BigEndian>(),
                ByteOrder::Little => self.cursor.$read::<LittleEndian>(),
            };
            Ok(value?)
        }
    };
}

impl<'a> ByteCursor<'a> {
    /// Create a new cursor at position 0
    pub fn new(data: &'a [u8], byte_order: ByteOrder) -> Self {
        Self {
            cursor: Cursor::new(data),
            byte_order,
        }
    }

    /// The whole underlying buffer
    pub fn data(&self) -> &'a [u8] {
        *self.cursor.get_ref()
    }

    /// Get current position in the stream
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Get the total length of the data
    pub fn len(&self) -> usize {
        self.data().len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get remaining bytes from current position
    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.position() as usize)
    }

    /// Check if we have at least `count` bytes remaining
    pub fn has_bytes(&self, count: usize) -> bool {
        self.remaining() >= count
    }

    fn ensure(&self, count: usize) -> Result<()> {
        // Alignment may leave the position past the end
        if self.position() <= self.len() as u64 && self.has_bytes(count) {
            Ok(())
        } else {
            Err(BinaryError::not_enough_data(
                count,
                self.remaining(),
                self.position(),
            ))
        }
    }

    /// Move to an absolute position
    pub fn seek(&mut self, pos: u64) -> Result<()> {
        if pos > self.len() as u64 {
            return Err(BinaryError::not_enough_data(
                pos as usize,
                self.len(),
                self.position(),
            ));
        }
        self.cursor.set_position(pos);
        Ok(())
    }

    /// Move forward by `delta` bytes without reading
    pub fn advance(&mut self, delta: usize) -> Result<()> {
        self.ensure(delta)?;
        self.cursor.set_position(self.position() + delta as u64);
        Ok(())
    }

    /// Align to the next 4-byte boundary
    pub fn align(&mut self) {
        self.align_to(4);
    }

    /// Align to the specified byte boundary
    ///
    /// Alignment never fails. A position pushed past the end of the buffer
    /// makes the next read fail instead.
    pub fn align_to(&mut self, alignment: u64) {
        if alignment <= 1 {
            return;
        }
        let pos = self.position();
        let rem = pos % alignment;
        if rem != 0 {
            self.cursor.set_position(pos + alignment - rem);
        }
    }

    /// Skip any run of zero bytes at the current position
    pub fn skip_zeros(&mut self) -> Result<()> {
        let data = self.data();
        let mut pos = self.position() as usize;
        while pos < data.len() && data[pos] == 0 {
            pos += 1;
        }
        if pos >= data.len() {
            return Err(BinaryError::not_enough_data(1, 0, self.position()));
        }
        self.cursor.set_position(pos as u64);
        Ok(())
    }

    /// Read the next `n` bytes, optionally skipping leading zero bytes first
    ///
    /// The position advances by the skipped zeros plus `n`.
    pub fn read(&mut self, n: usize, skip_leading_zeros: bool) -> Result<&'a [u8]> {
        let start = self.position();
        if skip_leading_zeros {
            self.skip_zeros()?;
        }
        if let Err(err) = self.ensure(n) {
            self.cursor.set_position(start);
            return Err(err);
        }
        let pos = self.position() as usize;
        let slice = &self.data()[pos..pos + n];
        self.cursor.set_position((pos + n) as u64);
        Ok(slice)
    }

    /// Interpret the next `n` bytes as an unsigned integer
    pub fn read_fixed_uint(
        &mut self,
        n: usize,
        order: ByteOrder,
        skip_leading_zeros: bool,
    ) -> Result<u64> {
        if n == 0 || n > 8 {
            return Err(BinaryError::invalid_format(
                "fixed-width integer",
                self.position(),
                format!("width {} is outside 1..=8", n),
            ));
        }
        let bytes = self.read(n, skip_leading_zeros)?;
        let value = match order {
            ByteOrder::Big => bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64),
            ByteOrder::Little => bytes
                .iter()
                .rev()
                .fold(0u64, |acc, &b| (acc << 8) | b as u64),
        };
        Ok(value)
    }

    /// Read a zero-delimited field
    ///
    /// Leading zero bytes are skipped, then bytes are collected up to (not
    /// including) the next zero byte, which is left unconsumed. A field that
    /// runs to the end of the buffer is returned as-is.
    pub fn read_zero_delimited(&mut self) -> Result<&'a [u8]> {
        self.skip_zeros()?;
        let data = self.data();
        let start = self.position() as usize;
        let end = data[start..]
            .iter()
            .position(|&b| b == 0)
            .map(|p| start + p)
            .unwrap_or(data.len());
        self.cursor.set_position(end as u64);
        Ok(&data[start..end])
    }

    /// Read a zero-delimited field as text
    pub fn read_zero_delimited_str(&mut self) -> Result<String> {
        let offset = self.position();
        let bytes = self.read_zero_delimited()?;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|e| BinaryError::invalid_format("string", offset, e.to_string()))
    }

    /// Read a zero-delimited field as big-endian digits of an integer
    ///
    /// Precondition: the value's significant bytes contain no zero byte and
    /// fit in 8 bytes. Values violating this cannot be represented.
    pub fn read_zero_delimited_uint(&mut self) -> Result<u64> {
        let offset = self.position();
        let bytes = self.read_zero_delimited()?;
        if bytes.len() > 8 {
            return Err(BinaryError::invalid_format(
                "zero-delimited integer",
                offset,
                format!("{} significant bytes do not fit in 64 bits", bytes.len()),
            ));
        }
        Ok(bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64))
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.cursor.read_u8()?)
    }

    /// Read a boolean (as u8, 0 = false, non-zero = true)
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    read_typed!(
        /// Read an unsigned 16-bit integer
        read_u16, u16, 2, read_u16
    );
    read_typed!(
        /// Read a signed 16-bit integer
        read_i16, i16, 2, read_i16
    );
    read_typed!(
        /// Read an unsigned 32-bit integer
        read_u32, u32, 4, read_u32
    );
    read_typed!(
        /// Read a signed 32-bit integer
        read_i32, i32, 4, read_i32
    );
    read_typed!(
        /// Read an unsigned 64-bit integer
        read_u64, u64, 8, read_u64
    );
    read_typed!(
        /// Read a signed 64-bit integer
        read_i64, i64, 8, read_i64
    );
    read_typed!(
        /// Read a 32-bit floating point number
        read_f32, f32, 4, read_f32
    );

    /// Read a 32-bit count and reject negative values
    pub fn read_count(&mut self, field: &str) -> Result<usize> {
        let offset = self.position();
        let count = self.read_i32()?;
        usize::try_from(count).map_err(|_| {
            BinaryError::invalid_format(field, offset, format!("negative count {}", count))
        })
    }

    /// Read a fixed number of bytes
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        Ok(self.read(count, false)?.to_vec())
    }

    /// Read a null-terminated string (the terminator is consumed)
    pub fn read_cstring(&mut self) -> Result<String> {
        let data = self.data();
        let start = self.position() as usize;
        let end = data
            .get(start..)
            .and_then(|rest| rest.iter().position(|&b| b == 0))
            .map(|p| start + p)
            .ok_or_else(|| {
                BinaryError::not_enough_data(self.remaining() + 1, self.remaining(), start as u64)
            })?;
        let text = std::str::from_utf8(&data[start..end])
            .map_err(|e| BinaryError::invalid_format("string", start as u64, e.to_string()))?
            .to_string();
        self.cursor.set_position(end as u64 + 1);
        Ok(text)
    }

    /// Read a byte array with a 32-bit length prefix
    pub fn read_byte_array(&mut self, field: &str) -> Result<Vec<u8>> {
        let length = self.read_count(field)?;
        self.read_bytes(length)
    }

    /// Read an aligned string (32-bit length, bytes, align to 4)
    pub fn read_aligned_string(&mut self) -> Result<String> {
        let offset = self.position();
        let bytes = self.read_byte_array("string length")?;
        self.align();
        String::from_utf8(bytes)
            .map_err(|e| BinaryError::invalid_format("string", offset, e.to_string()))
    }

    /// Get the current byte order
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Set the byte order
    pub fn set_byte_order(&mut self, byte_order: ByteOrder) {
        self.byte_order = byte_order;
    }

    /// Get a slice of the remaining data
    pub fn remaining_slice(&self) -> &'a [u8] {
        let pos = (self.position() as usize).min(self.len());
        &self.data()[pos..]
    }

    /// Create a new cursor for a subset of the data
    pub fn sub_cursor(&self, offset: usize, length: usize) -> Result<ByteCursor<'a>> {
        let data = self.data();
        let end = offset
            .checked_add(length)
            .filter(|&end| end <= data.len())
            .ok_or_else(|| {
                BinaryError::not_enough_data(offset.saturating_add(length), data.len(), offset as u64)
            })?;
        Ok(ByteCursor::new(&data[offset..end], self.byte_order))
    }
}
