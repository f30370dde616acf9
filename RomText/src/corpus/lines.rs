//! Shared alignment of flat line lists (captions and talks)
//!
//! A partition is a run of entries holding `blocks` equally sized locale
//! blocks back to back: the entry for file `f` in block `b` sits at
//! `b * file_count + f`. Line counts and keys come from block 0.

use indexmap::IndexMap;

use super::dedup::{DedupState, collection_key};
use super::{AlignedTuple, Corpus, CorpusValue, is_translated};
use crate::error::{Error, Result};

/// A decoded flat record: file id and its lines
pub type LineEntry = (u32, Vec<String>);

/// How one family lays out and names its partitions
pub(crate) struct LineFamily<'a> {
    pub name: &'static str,
    pub key_prefix: &'a str,
    pub blocks: usize,
    /// Block index of each selected locale, in tuple order
    pub slots: [usize; 3],
}

impl LineFamily<'_> {
    pub fn check_slots(&self) -> Result<()> {
        match self.slots.iter().find(|&&slot| slot >= self.blocks) {
            Some(&slot) => Err(Error::MissingLocaleSection { table: self.name.to_string(), slot }),
            None => Ok(()),
        }
    }
}

/// Index of the first entry appended by the patch, or the end of the list
///
/// Ids equal to the primary file count stay in the earlier partition.
pub(crate) fn appended_boundary(entries: &[&LineEntry], primary_file_count: usize) -> usize {
    entries
        .iter()
        .position(|(id, _)| *id as usize > primary_file_count)
        .unwrap_or(entries.len())
}

/// Align one partition into `corpus`, returning the number of files kept
pub(crate) fn align_partition(
    family: &LineFamily<'_>,
    entries: &[&LineEntry],
    dedup: &mut DedupState,
    corpus: &mut Corpus,
) -> Result<usize> {
    if entries.len() % family.blocks != 0 {
        return Err(Error::PartitionMisaligned {
            family: family.name,
            len: entries.len(),
            blocks: family.blocks,
        });
    }
    let file_count = entries.len() / family.blocks;
    let mut kept = 0;

    for (file, entry) in entries[..file_count].iter().enumerate() {
        let (id, first_block) = *entry;
        let mut lines = IndexMap::new();
        for line in 0..first_block.len() {
            let texts = family.slots.map(|slot| {
                entries[file_count * slot + file]
                    .1
                    .get(line)
                    .map_or("", String::as_str)
            });
            if is_translated(&texts) {
                lines.insert(line, AlignedTuple::from_texts(texts));
            }
        }

        if lines.is_empty() || !dedup.insert(collection_key(lines.values())) {
            continue;
        }
        corpus.insert(format!("{}{id}", family.key_prefix), CorpusValue::Lines(lines));
        kept += 1;
    }
    Ok(kept)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A partition of `blocks * files` entries with consecutive ids
    pub(crate) fn partition(
        first_id: u32,
        blocks: usize,
        files: usize,
        lines: impl Fn(usize, usize) -> Vec<String>,
    ) -> Vec<LineEntry> {
        (0..blocks * files)
            .map(|i| (first_id + i as u32, lines(i % files, i / files)))
            .collect()
    }

    #[test]
    fn test_partition_layout() {
        let entries = partition(0, 3, 2, |file, block| vec![format!("{file}-{block}")]);
        let refs: Vec<_> = entries.iter().collect();
        let family = LineFamily { name: "test", key_prefix: "k/", blocks: 3, slots: [0, 2, 1] };
        let mut corpus = Corpus::new();

        let kept = align_partition(&family, &refs, &mut DedupState::new(), &mut corpus).unwrap();
        assert_eq!(kept, 2);
        let Some(CorpusValue::Lines(lines)) = corpus.get("k/1") else {
            panic!("missing k/1");
        };
        assert_eq!(lines[&0], AlignedTuple::new("1-0", "1-2", "1-1"));
    }

    #[test]
    fn test_boundary_is_strict() {
        let entries = [(9, Vec::new()), (10, Vec::new()), (11, Vec::new())];
        let refs: Vec<_> = entries.iter().collect();
        assert_eq!(appended_boundary(&refs, 10), 2);
        assert_eq!(appended_boundary(&refs, 20), 3);
    }

    #[test]
    fn test_slot_outside_blocks() {
        let family = LineFamily { name: "test", key_prefix: "", blocks: 2, slots: [0, 1, 2] };
        assert!(matches!(family.check_slots(), Err(Error::MissingLocaleSection { slot: 2, .. })));
    }
}
