//! Bounds-checked byte cursor.
//!
//! Every variable-length structure in a dex file is measured by walking it:
//! a `Cursor` starts at the structure's offset and its final position is the
//! structure's end. Reads past the buffer fail with `TruncatedStream`.

use object::{Bytes, LittleEndian as LE, Pod, U32};

use crate::error::{DexError, Result};

/// Maximum encoded length of a 32-bit ULEB128 value.
pub const MAX_ULEB128_LEN: usize = 5;

/// Decodes an unsigned LEB128 value at `offset`.
///
/// Returns the value and the number of bytes consumed (1 to 5). The fifth
/// byte contributes its low four bits; anything above is dropped without
/// complaint, as Dalvik's own decoder does.
pub fn decode_uleb128(data: &[u8], offset: usize) -> Result<(u32, usize)> {
    let byte_at = |pos: usize| {
        data.get(pos)
            .copied()
            .ok_or(DexError::TruncatedStream { offset: pos })
    };

    let mut result: u32 = 0;
    for i in 0..MAX_ULEB128_LEN - 1 {
        let byte = byte_at(offset + i)?;
        result |= u32::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((result, i + 1));
        }
    }
    let last = byte_at(offset + MAX_ULEB128_LEN - 1)?;
    result |= u32::from(last) << 28;
    Ok((result, MAX_ULEB128_LEN))
}

#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    start: usize,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Positions a cursor at a file offset taken from the file itself.
    pub fn at(data: &'a [u8], offset: impl Into<u64>) -> Result<Self> {
        let offset = offset.into();
        if offset >= data.len() as u64 {
            return Err(DexError::OffsetOutOfRange {
                offset,
                len: data.len(),
            });
        }
        let start = offset as usize;
        Ok(Self { data, start, pos: start })
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes consumed since the cursor was created.
    pub fn consumed(&self) -> usize {
        self.pos - self.start
    }

    pub fn read_uleb128(&mut self) -> Result<u32> {
        let (value, len) = decode_uleb128(self.data, self.pos)?;
        self.pos += len;
        Ok(value)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or(DexError::TruncatedStream { offset: self.pos })?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.read::<U32<LE>>()?.get(LE))
    }

    /// Reads a fixed-layout record and advances past it.
    pub fn read<T: Pod>(&mut self) -> Result<&'a T> {
        let value = Bytes(self.data)
            .read_at::<T>(self.pos)
            .map_err(|()| DexError::TruncatedStream { offset: self.pos })?;
        self.pos += std::mem::size_of::<T>();
        Ok(value)
    }

    /// Advances without looking at the bytes. The skipped range must exist.
    pub fn skip(&mut self, len: u64) -> Result<()> {
        let end = (self.pos as u64).saturating_add(len);
        if end > self.data.len() as u64 {
            return Err(DexError::TruncatedStream { offset: self.data.len() });
        }
        self.pos = end as usize;
        Ok(())
    }
}
