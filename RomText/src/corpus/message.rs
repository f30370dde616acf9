//! Alignment of a standalone message table
//!
//! Keys are `"<table>-<row>"`. Rows are deduplicated across the whole file
//! with every digit and line break removed, and rows made of numbers only
//! are dropped.

use indexmap::IndexMap;

use super::dedup::DedupState;
use super::{AlignedTuple, LocaleSelection, is_translated};
use crate::formats::MessageTableSet;

fn message_key(texts: &[&str; 3]) -> String {
    texts
        .map(|text| {
            text.chars()
                .filter(|&c| !(c.is_ascii_digit() || ('０'..='９').contains(&c) || c == '\n'))
                .collect::<String>()
        })
        .join("\0")
}

/// Align one message table across the selected locales
#[must_use]
pub fn align_message_table(set: &MessageTableSet, locales: LocaleSelection) -> IndexMap<String, AlignedTuple> {
    let slots = locales.slots();
    let [source, ..] = slots;
    let table_count = set.sections.get(source).map_or(0, Vec::len);

    let mut dedup = DedupState::new();
    let mut aligned = IndexMap::new();
    for table in 0..table_count {
        for row in 0..set.rows(source, table).len() {
            let texts = slots.map(|slot| set.rows(slot, table).get(row).map_or("", String::as_str));
            if !is_translated(&texts) {
                continue;
            }
            let key = message_key(&texts);
            if key.chars().all(|c| c == '\0') || !dedup.insert(key) {
                continue;
            }
            aligned.insert(format!("{table}-{row}"), AlignedTuple::from_texts(texts));
        }
    }

    tracing::debug!("Message table: {} rows kept", aligned.len());
    aligned
}
