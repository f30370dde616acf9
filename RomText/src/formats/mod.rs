//! Text record formats found inside the archive
//!
//! Records are recognized by [`signature::classify`] and decoded by the
//! matching parser. All decoders return normalized strings.

pub mod bytes;
pub mod caption;
pub mod event_text;
pub mod message_table;
pub mod nested_table;
pub mod signature;
pub mod text;

pub use caption::parse_caption_bytes;
pub use event_text::{is_voice_record, parse_event_text_bytes, parse_voice_text_bytes};
pub use message_table::{MessageTableSet, parse_message_table_bytes, read_message_table};
pub use nested_table::{PresenceMask, StringTableSet, parse_nested_table_bytes};
pub use signature::{RawHeader, SubFormat, classify};
pub use text::normalize;
