//! Caption alignment
//!
//! Caption entries fall into three partitions: the base game up to the
//! configured group boundary, the second group up to the first patch-appended
//! file, and the appended files. Captions carry one locale block more than
//! the game locales, inserted right after the first one, so every selected
//! slot except the first is shifted by one.

use super::dedup::DedupState;
use super::lines::{LineEntry, LineFamily, align_partition, appended_boundary};
use super::{Corpus, LocaleSelection};
use crate::config::CaptionFamilyConfig;
use crate::error::{Error, Result};

const FAMILY: &str = "captions";

/// Caption block index of each selected locale
#[must_use]
pub fn caption_slots(locales: LocaleSelection) -> [usize; 3] {
    let [source, comparison, target] = locales.slots();
    [source, comparison + 1, target + 1]
}

/// Align decoded captions into `corpus`
///
/// Duplicates are detected across all three partitions.
///
/// # Errors
///
/// Fails if the group boundary id is absent, lies after the appended files,
/// or a partition does not split into whole locale blocks.
pub fn align_captions(
    entries: &[LineEntry],
    primary_file_count: usize,
    config: &CaptionFamilyConfig,
    locales: LocaleSelection,
    corpus: &mut Corpus,
) -> Result<()> {
    if entries.is_empty() {
        tracing::debug!("No captions scanned");
        return Ok(());
    }
    let family = LineFamily {
        name: FAMILY,
        key_prefix: &config.key_prefix,
        blocks: config.locale_blocks,
        slots: caption_slots(locales),
    };
    family.check_slots()?;

    let entries: Vec<&LineEntry> = entries.iter().collect();
    let group = entries
        .iter()
        .position(|(id, _)| *id == config.group_boundary_id)
        .ok_or(Error::PartitionBoundaryMissing { family: FAMILY, id: config.group_boundary_id })?;
    let appended = appended_boundary(&entries, primary_file_count);
    if group > appended {
        return Err(Error::PartitionOrder { family: FAMILY, start: group, end: appended });
    }

    let mut dedup = DedupState::new();
    let mut kept = 0;
    for range in [0..group, group..appended, appended..entries.len()] {
        kept += align_partition(&family, &entries[range], &mut dedup, corpus)?;
    }
    tracing::debug!("Captions: {} of {} entries kept as files", kept, entries.len());
    Ok(())
}
