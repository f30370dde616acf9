//! Null-terminated string decoding and text normalization
//!
//! Every string leaving a decoder goes through [`normalize`] so that later
//! comparisons and dedup keys never see layout noise.

use crate::error::{Error, Result};

/// Normalize extracted text.
///
/// No-break spaces become spaces, carriage returns are dropped, the ESC
/// control byte becomes `$`, and surrounding whitespace is trimmed.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .filter(|&c| c != '\r')
        .map(|c| match c {
            '\u{a0}' => ' ',
            '\u{1b}' => '$',
            other => other,
        })
        .collect();
    replaced.trim().to_string()
}

/// Decode the raw null-terminated string starting at `offset`.
///
/// A string without a terminator runs to the end of the record. Invalid
/// UTF-8 is replaced lossily.
pub fn read_cstring_raw(data: &[u8], offset: usize, context: &'static str) -> Result<String> {
    let tail = data
        .get(offset..)
        .ok_or(Error::OffsetOutOfRange { context, offset, len: data.len() })?;
    let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    Ok(String::from_utf8_lossy(&tail[..end]).into_owned())
}

/// Decode and normalize the null-terminated string starting at `offset`.
pub fn read_cstring(data: &[u8], offset: usize, context: &'static str) -> Result<String> {
    read_cstring_raw(data, offset, context).map(|s| normalize(&s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_rules() {
        assert_eq!(normalize("  a\u{a0}b\r\n"), "a b");
        assert_eq!(normalize("\u{1b}C1Hello"), "$C1Hello");
        assert_eq!(normalize("\u{3000}全角\u{3000}"), "全角");
        assert_eq!(normalize(" \r "), "");
    }

    #[test]
    fn test_read_cstring_stops_at_null() {
        let data = b"abc\0de\0f";
        assert_eq!(read_cstring(data, 0, "t").unwrap(), "abc");
        assert_eq!(read_cstring(data, 4, "t").unwrap(), "de");
        // Unterminated tail runs to the end
        assert_eq!(read_cstring(data, 7, "t").unwrap(), "f");
        // Offset equal to length is an empty string
        assert_eq!(read_cstring(data, 8, "t").unwrap(), "");
        assert!(read_cstring(data, 9, "t").is_err());
    }

    #[test]
    fn test_read_cstring_normalizes() {
        let data = b" hi\r\0";
        assert_eq!(read_cstring_raw(data, 0, "t").unwrap(), " hi\r");
        assert_eq!(read_cstring(data, 0, "t").unwrap(), "hi");
    }
}
