//! Header-signature classification of archive records
//!
//! Text records carry no magic; they are recognized by arithmetic relations
//! between their leading header words. Predicates are tested in a fixed
//! priority order and the first match wins.

use byteorder::{ByteOrder, LittleEndian};

/// Number of leading `u32` words used for classification
pub const HEADER_WORDS: usize = 6;

/// Byte length of the classification header
pub const HEADER_SIZE: usize = HEADER_WORDS * 4;

/// Leading header words of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawHeader(pub [u32; HEADER_WORDS]);

impl RawHeader {
    /// Parse the header from the start of `bytes`.
    ///
    /// Records shorter than [`HEADER_SIZE`] are zero-padded.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut padded = [0u8; HEADER_SIZE];
        let len = bytes.len().min(HEADER_SIZE);
        padded[..len].copy_from_slice(&bytes[..len]);

        let mut words = [0u32; HEADER_WORDS];
        LittleEndian::read_u32_into(&padded, &mut words);
        Self(words)
    }

    /// Header word `i`
    #[must_use]
    pub fn word(&self, i: usize) -> u32 {
        self.0[i]
    }
}

/// Text sub-format a record was classified as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubFormat {
    /// Not a text record
    None,
    /// Section → table → row → cell string tables
    NestedTable,
    /// Flat caption string list
    Caption,
    /// Event dialog text with a separate pointer table
    EventTextPlain,
    /// Voice-line text with absolute pointers and `[nnnn]` tags
    EventTextVoice,
}

impl SubFormat {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::NestedTable => "nested-table",
            Self::Caption => "caption",
            Self::EventTextPlain => "event-text",
            Self::EventTextVoice => "voice-text",
        }
    }
}

type Predicate = fn(&RawHeader) -> bool;

fn is_nested_table(h: &RawHeader) -> bool {
    h.word(0) == 12 && h.word(1) == 100 && h.word(3).checked_sub(h.word(2)) == Some(h.word(1))
}

fn is_caption(h: &RawHeader) -> bool {
    h.word(0) == 0x2962 && h.word(1).checked_mul(4).and_then(|n| n.checked_add(8)) == Some(h.word(2))
}

fn is_event_text(h: &RawHeader) -> bool {
    h.word(0) == 1 && h.word(1) == 1 && h.word(2) == 0x20 && h.word(5) == 0xEEEE_EEEE
}

// Tentative: the record body must still carry the `[nnnn]` tag, see `event_text::is_voice_record`
fn is_voice_text(h: &RawHeader) -> bool {
    h.word(0).checked_mul(8).and_then(|n| n.checked_add(4)) == Some(h.word(1))
}

/// Signature predicates in priority order
const SIGNATURES: [(SubFormat, Predicate); 4] = [
    (SubFormat::NestedTable, is_nested_table),
    (SubFormat::Caption, is_caption),
    (SubFormat::EventTextPlain, is_event_text),
    (SubFormat::EventTextVoice, is_voice_text),
];

/// Classify a record by its header words.
///
/// A result of [`SubFormat::EventTextVoice`] is only a candidate until the
/// record body has been checked.
#[must_use]
pub fn classify(header: &RawHeader) -> SubFormat {
    SIGNATURES
        .iter()
        .find(|(_, matches)| matches(header))
        .map_or(SubFormat::None, |&(format, _)| format)
}
