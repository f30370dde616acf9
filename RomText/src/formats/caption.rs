//! Caption records: a counted array of string offsets
//!
//! `u32 magic (0x2962)`, `u32 count`, then `count` offsets relative to byte 8.

use super::bytes::{offset_from, read_u32};
use super::text::read_cstring;
use crate::error::Result;

/// Signature word of caption records
pub const CAPTION_MAGIC: u32 = 0x2962;

const TABLE_START: usize = 8;

/// Parse a caption record into its lines
pub fn parse_caption_bytes(data: &[u8]) -> Result<Vec<String>> {
    let count = read_u32(data, 4, "caption count")? as usize;
    let mut lines = Vec::with_capacity(count.min(4096));

    for i in 0..count {
        let relative = read_u32(data, TABLE_START + i * 4, "caption offset")?;
        let offset = offset_from(TABLE_START, relative, "caption string", data.len())?;
        lines.push(read_cstring(data, offset, "caption string")?);
    }

    Ok(lines)
}
