//! Cross-locale alignment of decoded text into a deduplicated corpus
//!
//! [`build_corpus`] runs three passes over a finished scan, one per text
//! family, each with its own [`DedupState`]. Every pass builds one tuple per
//! logical unit from the three selected locales, drops untranslated or empty
//! tuples and keeps the first occurrence of each duplicate.

mod captions;
mod dedup;
mod lines;
mod locale;
pub mod message;
mod tables;
mod talks;

use indexmap::IndexMap;
use serde::Serialize;

use crate::archive::ArchiveIndex;
use crate::config::CorpusConfig;
use crate::error::Result;
use crate::scan::ScanOutput;

pub use captions::{align_captions, caption_slots};
pub use dedup::{DedupState, cell_key, collection_key, strip_trailing_digits};
pub use locale::{Locale, LocaleSelection};
pub use message::align_message_table;
pub use tables::align_tables;
pub use talks::align_talks;

/// One logical unit of text in the source, comparison and target locales
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AlignedTuple(pub [String; 3]);

impl AlignedTuple {
    #[must_use]
    pub fn new(source: impl Into<String>, comparison: impl Into<String>, target: impl Into<String>) -> Self {
        Self([source.into(), comparison.into(), target.into()])
    }

    /// Collect the three selected texts, in tuple order
    pub(crate) fn from_texts(texts: [&str; 3]) -> Self {
        Self(texts.map(str::to_string))
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.0[0]
    }

    #[must_use]
    pub fn comparison(&self) -> &str {
        &self.0[1]
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.0[2]
    }

    #[must_use]
    pub fn texts(&self) -> &[String; 3] {
        &self.0
    }
}

/// Whether a tuple carries a real translation
///
/// Identical comparison and target text means the line was never translated.
pub(crate) fn is_translated(texts: &[&str; 3]) -> bool {
    texts[1] != texts[2] && texts.iter().all(|text| !text.is_empty())
}

/// Aligned cells of one table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RowValue {
    /// A row with a single surviving cell
    Flat(Vec<AlignedTuple>),
    /// Surviving cells by cell index
    Cells(IndexMap<usize, AlignedTuple>),
}

/// Aligned content of one corpus entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CorpusValue {
    /// Nested tables: table index → row index → row
    Tables(IndexMap<usize, IndexMap<usize, RowValue>>),
    /// Captions and talks: line index → tuple
    Lines(IndexMap<usize, AlignedTuple>),
}

/// The final corpus, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Corpus {
    entries: IndexMap<String, CorpusValue>,
}

impl Corpus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CorpusValue> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, CorpusValue> {
        self.entries.iter()
    }

    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, CorpusValue> {
        self.entries
    }

    pub(crate) fn insert(&mut self, key: String, value: CorpusValue) {
        self.entries.insert(key, value);
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = (&'a String, &'a CorpusValue);
    type IntoIter = indexmap::map::Iter<'a, String, CorpusValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Align a finished scan into the corpus
///
/// Runs the table, caption and talk passes in that order.
///
/// # Errors
///
/// Fails if an allow-listed table is missing or lacks a selected locale, or
/// if the caption or talk entries contradict the configured partitioning.
pub fn build_corpus(scan: &ScanOutput, index: &ArchiveIndex, config: &CorpusConfig) -> Result<Corpus> {
    config.locales.validate()?;
    let mut corpus = Corpus::new();

    align_tables(&scan.tables, &config.tables, config.locales, &mut corpus)?;
    let after_tables = corpus.len();

    align_captions(
        &scan.captions,
        index.primary_file_count(),
        &config.captions,
        config.locales,
        &mut corpus,
    )?;
    let after_captions = corpus.len();

    align_talks(&scan.talks, index.primary_file_count(), &config.talks, config.locales, &mut corpus)?;

    tracing::info!(
        "Corpus built: {} tables, {} captions, {} talks",
        after_tables,
        after_captions - after_tables,
        corpus.len() - after_captions
    );
    Ok(corpus)
}
