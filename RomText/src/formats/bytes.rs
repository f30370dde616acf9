//! Bounds-checked little-endian field access over record bytes

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

fn field<'a>(data: &'a [u8], offset: usize, width: usize, context: &'static str) -> Result<&'a [u8]> {
    offset
        .checked_add(width)
        .and_then(|end| data.get(offset..end))
        .ok_or(Error::OffsetOutOfRange { context, offset, len: data.len() })
}

/// Read a `u16` at `offset`.
pub fn read_u16(data: &[u8], offset: usize, context: &'static str) -> Result<u16> {
    field(data, offset, 2, context).map(LittleEndian::read_u16)
}

/// Read a `u32` at `offset`.
pub fn read_u32(data: &[u8], offset: usize, context: &'static str) -> Result<u32> {
    field(data, offset, 4, context).map(LittleEndian::read_u32)
}

/// Read an `i32` at `offset`.
pub fn read_i32(data: &[u8], offset: usize, context: &'static str) -> Result<i32> {
    field(data, offset, 4, context).map(LittleEndian::read_i32)
}

/// Read a `u64` at `offset`.
pub fn read_u64(data: &[u8], offset: usize, context: &'static str) -> Result<u64> {
    field(data, offset, 8, context).map(LittleEndian::read_u64)
}

/// Read a single byte at `offset`.
pub fn read_u8(data: &[u8], offset: usize, context: &'static str) -> Result<u8> {
    data.get(offset)
        .copied()
        .ok_or(Error::OffsetOutOfRange { context, offset, len: data.len() })
}

/// Add a record-relative offset to a base, failing on overflow.
pub fn offset_from(base: usize, relative: u32, context: &'static str, len: usize) -> Result<usize> {
    base.checked_add(relative as usize)
        .ok_or(Error::OffsetOutOfRange { context, offset: base, len })
}
