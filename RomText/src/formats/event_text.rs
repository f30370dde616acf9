//! Event dialog text records
//!
//! Two layouts share this module:
//!
//! - plain event text: a 0x20-byte header (`1, 1, 0x20, pointer_table_size,
//!   count, 0xEEEEEEEE`), a pointer table at 0x20, and strings addressed
//!   relative to the end of the pointer table
//! - voice text: `u32 count` followed by absolute string pointers; every line
//!   is wrapped as `[nnnn]line＠NNNNNN#NN`

use super::bytes::{offset_from, read_u32};
use super::signature::RawHeader;
use super::text::read_cstring;
use crate::error::Result;

/// Start of the pointer table in plain event text
const PLAIN_TABLE_START: usize = 0x20;

/// Placeholder for unused plain event-text slots
pub const TEMPORARY_MESSAGE: &str = "tTemporarymessage";

/// Placeholder for unused voice-text slots
pub const DUMMY_VOICE: &str = "[9999]NULL#00＠DummyVoice";

/// Leading `[nnnn]` tag length in characters
const VOICE_PREFIX_CHARS: usize = 6;

/// Trailing `＠NNNNNN#NN` tag length in characters
const VOICE_SUFFIX_CHARS: usize = 10;

/// Parse a plain event-text record
pub fn parse_event_text_bytes(data: &[u8], header: &RawHeader) -> Result<Vec<String>> {
    let pointer_table_size = header.word(3);
    let count = header.word(4) as usize;
    let strings_base = offset_from(PLAIN_TABLE_START, pointer_table_size, "event text strings", data.len())?;

    let mut lines = Vec::with_capacity(count.min(4096));
    for i in 0..count {
        let relative = read_u32(data, PLAIN_TABLE_START + i * 4, "event text pointer")?;
        let offset = offset_from(strings_base, relative, "event text string", data.len())?;
        let text = read_cstring(data, offset, "event text string")?;
        lines.push(if text == TEMPORARY_MESSAGE { String::new() } else { text });
    }

    Ok(lines)
}

/// Whether a voice-text candidate really starts its first line with a `[nnnn]` tag
#[must_use]
pub fn is_voice_record(data: &[u8], header: &RawHeader) -> bool {
    let first = header.word(1) as usize;
    data.get(first) == Some(&b'[') && first.checked_add(5).and_then(|i| data.get(i)) == Some(&b']')
}

/// Parse a voice-text record
pub fn parse_voice_text_bytes(data: &[u8], header: &RawHeader) -> Result<Vec<String>> {
    let count = header.word(0) as usize;

    let mut lines = Vec::with_capacity(count.min(4096));
    for i in 0..count {
        let offset = read_u32(data, 4 + i * 4, "voice text pointer")? as usize;
        let text = read_cstring(data, offset, "voice text string")?;
        lines.push(strip_voice_tags(&text));
    }

    Ok(lines)
}

/// Recover the spoken line from a tagged voice-text entry
#[must_use]
pub fn strip_voice_tags(text: &str) -> String {
    if text == DUMMY_VOICE {
        return String::new();
    }
    let len = text.chars().count();
    if len <= VOICE_PREFIX_CHARS + VOICE_SUFFIX_CHARS {
        return String::new();
    }
    text.chars()
        .skip(VOICE_PREFIX_CHARS)
        .take(len - VOICE_PREFIX_CHARS - VOICE_SUFFIX_CHARS)
        .collect()
}
