//! Event and voice text alignment
//!
//! Talk entries form two partitions of twelve locale blocks each: the base
//! game and the patch-appended files. One run of appended files is stored
//! out of block order and is moved back in place before partitioning.

use super::dedup::DedupState;
use super::lines::{LineEntry, LineFamily, align_partition, appended_boundary};
use super::{Corpus, Locale, LocaleSelection};
use crate::config::{TalkFamilyConfig, TalkReorder};
use crate::error::{Error, Result};

const FAMILY: &str = "talks";

/// Align decoded event and voice texts into `corpus`
///
/// # Errors
///
/// Fails if a reorder marker is absent or out of order, or a partition does
/// not split into whole locale blocks.
pub fn align_talks(
    entries: &[LineEntry],
    primary_file_count: usize,
    config: &TalkFamilyConfig,
    locales: LocaleSelection,
    corpus: &mut Corpus,
) -> Result<()> {
    if entries.is_empty() {
        tracing::debug!("No talks scanned");
        return Ok(());
    }
    let family = LineFamily {
        name: FAMILY,
        key_prefix: &config.key_prefix,
        blocks: Locale::COUNT,
        slots: locales.slots(),
    };

    let mut entries: Vec<&LineEntry> = entries.iter().collect();
    let appended = appended_boundary(&entries, primary_file_count);
    if let Some(reorder) = config.reorder {
        entries = reorder_appended(entries, appended, primary_file_count, reorder)?;
    }

    let mut dedup = DedupState::new();
    let mut kept = 0;
    for range in [0..appended, appended..entries.len()] {
        kept += align_partition(&family, &entries[range], &mut dedup, corpus)?;
    }
    tracing::debug!("Talks: {} of {} entries kept as files", kept, entries.len());
    Ok(())
}

/// Move the run `block_start..=block_end` in front of `insert_before`
///
/// Markers are append indices, looked up from `from` onwards.
pub(crate) fn reorder_appended<'a>(
    entries: Vec<&'a LineEntry>,
    from: usize,
    primary_file_count: usize,
    reorder: TalkReorder,
) -> Result<Vec<&'a LineEntry>> {
    let find = |append_index: u32| {
        let id = primary_file_count + append_index as usize;
        entries[from..]
            .iter()
            .position(|(entry_id, _)| *entry_id as usize == id)
            .map(|i| from + i)
            .ok_or(Error::PartitionBoundaryMissing { family: FAMILY, id: id as u32 })
    };
    let before = find(reorder.insert_before)?;
    let start = find(reorder.block_start)?;
    let end = find(reorder.block_end)?;
    if before > start {
        return Err(Error::PartitionOrder { family: FAMILY, start: before, end: start });
    }
    if start > end {
        return Err(Error::PartitionOrder { family: FAMILY, start, end });
    }

    let mut reordered = Vec::with_capacity(entries.len());
    reordered.extend_from_slice(&entries[..before]);
    reordered.extend_from_slice(&entries[start..=end]);
    reordered.extend_from_slice(&entries[before..start]);
    reordered.extend_from_slice(&entries[end + 1..]);
    Ok(reordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::lines::tests::partition;
    use crate::corpus::{AlignedTuple, CorpusValue};
    use pretty_assertions::assert_eq;

    const REORDER: TalkReorder = TalkReorder { block_start: 3, block_end: 4, insert_before: 1 };

    fn ids(entries: &[&LineEntry]) -> Vec<u32> {
        entries.iter().map(|(id, _)| *id).collect()
    }

    #[test]
    fn test_reorder_moves_run_before_marker() {
        let entries: Vec<LineEntry> = [0, 1, 2, 51, 52, 53, 54, 55].map(|id| (id, Vec::new())).to_vec();
        let refs: Vec<_> = entries.iter().collect();

        let reordered = reorder_appended(refs, 3, 50, REORDER).unwrap();
        assert_eq!(ids(&reordered), vec![0, 1, 2, 53, 54, 51, 52, 55]);
    }

    #[test]
    fn test_default_reorder_keeps_every_entry() {
        const PRIMARY: u32 = 1000;
        let base: Vec<LineEntry> = (0..10).map(|id| (id, Vec::new())).collect();
        let appended: Vec<LineEntry> = (1..=600).map(|index| (PRIMARY + index, Vec::new())).collect();
        let entries: Vec<LineEntry> = base.into_iter().chain(appended).collect();
        let refs: Vec<_> = entries.iter().collect();

        let reordered = reorder_appended(refs, 10, PRIMARY as usize, TalkReorder::default()).unwrap();
        let append_indices: Vec<u32> = ids(&reordered[10..]).iter().map(|id| id - PRIMARY).collect();

        assert_eq!(reordered.len(), entries.len());
        assert_eq!(ids(&reordered[..10]), (0..10).collect::<Vec<_>>());
        let mut expected: Vec<u32> = (1..373).collect();
        expected.extend(483..=526);
        expected.extend(373..=482);
        expected.extend(527..=600);
        assert_eq!(append_indices, expected);
        // The moved run is 44 entries and lands right before 373
        let at = |index: u32| append_indices.iter().position(|&i| i == index).unwrap();
        assert_eq!(at(373) - at(483), 44);
    }

    #[test]
    fn test_reorder_markers_are_validated() {
        let entries: Vec<LineEntry> = [51, 52, 53].map(|id| (id, Vec::new())).to_vec();

        let err = reorder_appended(entries.iter().collect(), 0, 50, REORDER).unwrap_err();
        assert!(matches!(err, Error::PartitionBoundaryMissing { id: 54, .. }));

        let backwards = TalkReorder { block_start: 1, block_end: 2, insert_before: 3 };
        let err = reorder_appended(entries.iter().collect(), 0, 50, backwards).unwrap_err();
        assert!(matches!(err, Error::PartitionOrder { .. }));
    }

    #[test]
    fn test_talks_align_after_reorder() {
        let mut entries = partition(0, 12, 1, |file, block| vec![format!("base{file}-{block}")]);
        // Appended files 51..=74 stored so that 53 and 54 open the block order
        let position = |id: u32| match id {
            53 => 0,
            54 => 1,
            51 => 2,
            52 => 3,
            other => other as usize - 51,
        };
        entries.extend((51..=74).map(|id| {
            let p = position(id);
            (id, vec![format!("t{}-{}", p % 2, p / 2), "same".to_string()])
        }));
        let config = TalkFamilyConfig { reorder: Some(REORDER), ..TalkFamilyConfig::default() };

        let mut corpus = Corpus::new();
        align_talks(&entries, 50, &config, LocaleSelection::default(), &mut corpus).unwrap();

        assert_eq!(
            corpus.keys().collect::<Vec<_>>(),
            vec!["nx/event/talk_*/text/0", "nx/event/talk_*/text/53", "nx/event/talk_*/text/54"]
        );
        let Some(CorpusValue::Lines(lines)) = corpus.get("nx/event/talk_*/text/53") else {
            panic!("talk 53 missing");
        };
        // Line 1 reads the same in every locale and is dropped
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[&0], AlignedTuple::new("t0-0", "t0-11", "t0-1"));
    }

    #[test]
    fn test_duplicate_talk_files_across_partitions() {
        let text = |file: usize, block: usize| vec![format!("line{file}-{block}")];
        let mut entries = partition(0, 12, 1, text);
        entries.extend(partition(51, 12, 1, text));
        let config = TalkFamilyConfig { reorder: None, ..TalkFamilyConfig::default() };

        let mut corpus = Corpus::new();
        align_talks(&entries, 50, &config, LocaleSelection::default(), &mut corpus).unwrap();
        assert_eq!(corpus.keys().collect::<Vec<_>>(), vec!["nx/event/talk_*/text/0"]);
    }
}
