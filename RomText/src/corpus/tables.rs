//! Nested message tables
//!
//! Each section of a table record is one locale. Cells are aligned by
//! position across the selected sections, deduplicated within their row by
//! [`cell_key`], and rows are deduplicated within their table by the set of
//! cell keys they keep.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use super::dedup::{DedupState, cell_key};
use super::{AlignedTuple, Corpus, CorpusValue, LocaleSelection, RowValue, is_translated};
use crate::config::TableFamilyConfig;
use crate::error::{Error, Result};
use crate::formats::StringTableSet;

/// Align every allow-listed table into `corpus`
///
/// Every allow-listed table gets an entry, even when nothing survives.
///
/// # Errors
///
/// [`Error::MissingTable`] if an allow-listed table was not scanned,
/// [`Error::MissingLocaleSection`] if it has no section for a selected locale.
pub fn align_tables(
    tables: &IndexMap<String, StringTableSet>,
    config: &TableFamilyConfig,
    locales: LocaleSelection,
    corpus: &mut Corpus,
) -> Result<()> {
    for key in config.keys() {
        let set = tables.get(&key).ok_or_else(|| Error::MissingTable(key.clone()))?;
        let aligned = align_table_set(&key, set, config, locales)?;
        tracing::debug!("Table {}: {} tables kept", key, aligned.len());
        corpus.insert(key, CorpusValue::Tables(aligned));
    }
    Ok(())
}

fn align_table_set(
    name: &str,
    set: &StringTableSet,
    config: &TableFamilyConfig,
    locales: LocaleSelection,
) -> Result<IndexMap<usize, IndexMap<usize, RowValue>>> {
    let slots = locales.slots();
    if let Some(&slot) = slots.iter().find(|&&slot| slot >= set.section_count()) {
        return Err(Error::MissingLocaleSection { table: name.to_string(), slot });
    }
    let [source, ..] = slots;

    let mut aligned = IndexMap::new();
    for table in 0..set.table_count(source) {
        let single_column = set.row(source, table, 0).is_some_and(|cells| cells.len() == 1);
        let mut rows = IndexMap::new();
        let mut seen_rows = DedupState::new();

        for row in 0..set.row_count(source, table) {
            let cell_count = set.row(source, table, row).map_or(0, <[String]>::len);
            let mut seen_cells = DedupState::new();
            let mut cell_keys = BTreeSet::new();
            let mut cells = IndexMap::new();

            for cell in 0..cell_count {
                let texts = slots.map(|slot| {
                    set.row(slot, table, row)
                        .and_then(|cells| cells.get(cell))
                        .map_or("", String::as_str)
                });
                if !is_translated(&texts) || is_marker(config, &texts) {
                    continue;
                }
                let tuple = AlignedTuple::from_texts(texts);
                let key = cell_key(&tuple);
                if !seen_cells.insert(key.clone()) {
                    continue;
                }
                cell_keys.insert(key);
                cells.insert(cell, tuple);
            }

            if cells.is_empty() {
                continue;
            }
            let row_key = cell_keys.into_iter().collect::<Vec<_>>().join("\0");
            if !seen_rows.insert(row_key) {
                continue;
            }
            rows.insert(row, into_row_value(cells, single_column));
        }

        if !rows.is_empty() {
            aligned.insert(table, rows);
        }
    }
    Ok(aligned)
}

fn is_marker(config: &TableFamilyConfig, texts: &[&str; 3]) -> bool {
    config
        .untranslated_markers
        .iter()
        .any(|marker| texts[1] == marker || texts[2] == marker)
}

/// Single-column tables flatten every row; others keep cell indices
fn into_row_value(cells: IndexMap<usize, AlignedTuple>, single_column: bool) -> RowValue {
    if single_column {
        RowValue::Flat(cells.into_values().collect())
    } else {
        RowValue::Cells(cells)
    }
}
