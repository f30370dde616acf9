//! Scanning the archive: classify every file and decode the text records
//!
//! One pass over the merged index, one file at a time. The blob stays open
//! for the whole scan; standalone files are opened and closed per record.

use std::io::{Read, Seek};
use std::path::Path;

use indexmap::IndexMap;

use crate::archive::{ArchiveIndex, ArchiveLayout, ArchiveReader, FileDescriptor};
use crate::config::Exclusions;
use crate::error::Result;
use crate::formats::{
    StringTableSet, SubFormat, classify, is_voice_record, parse_caption_bytes, parse_event_text_bytes,
    parse_nested_table_bytes, parse_voice_text_bytes,
};

/// Progress callback type
pub type ProgressCallback<'a> = &'a dyn Fn(&ScanProgress);

/// Progress information during a scan
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Current descriptor number (1-indexed)
    pub current: usize,
    /// Total number of descriptors
    pub total: usize,
    pub file_id: u32,
}

impl ScanProgress {
    /// Get the progress percentage (0.0 - 1.0)
    #[must_use]
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

/// Counters collected while scanning
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub visited: usize,
    /// Placeholder ids skipped unread
    pub excluded: usize,
    pub compressed: usize,
    pub empty: usize,
    pub nested_tables: usize,
    pub captions: usize,
    pub event_texts: usize,
    pub voice_texts: usize,
    /// Files matching no text signature
    pub ignored: usize,
}

/// Decoded text of every recognized record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutput {
    /// Nested tables keyed by file name
    pub tables: IndexMap<String, StringTableSet>,
    /// Caption lines per file id, in index order
    pub captions: Vec<(u32, Vec<String>)>,
    /// Event and voice lines per file id, in index order
    pub talks: Vec<(u32, Vec<String>)>,
    pub stats: ScanStats,
}

/// Decoded content of one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedRecord {
    NestedTable(StringTableSet),
    Caption(Vec<String>),
    EventText(Vec<String>),
    VoiceText(Vec<String>),
}

/// Which files a scan looks at
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub exclusions: Exclusions,
}

/// Scan every readable file under `root`
pub fn scan_archive(
    root: impl AsRef<Path>,
    index: &ArchiveIndex,
    layout: &ArchiveLayout,
    options: &ScanOptions,
) -> Result<ScanOutput> {
    scan_archive_with_progress(root, index, layout, options, &|_| {})
}

/// Scan every readable file under `root`, reporting progress per descriptor
pub fn scan_archive_with_progress(
    root: impl AsRef<Path>,
    index: &ArchiveIndex,
    layout: &ArchiveLayout,
    options: &ScanOptions,
    progress: ProgressCallback,
) -> Result<ScanOutput> {
    let mut reader = ArchiveReader::open(root, &layout.data_blob)?;
    scan_with_reader(&mut reader, index, options, progress)
}

/// Scan using an already opened reader
pub fn scan_with_reader<R: Read + Seek>(
    reader: &mut ArchiveReader<R>,
    index: &ArchiveIndex,
    options: &ScanOptions,
    progress: ProgressCallback,
) -> Result<ScanOutput> {
    let mut output = ScanOutput::default();
    let total = index.len();

    for (i, descriptor) in index.iter().enumerate() {
        progress(&ScanProgress { current: i + 1, total, file_id: descriptor.id });
        output.stats.visited += 1;

        if options.exclusions.contains(descriptor.id, index.primary_file_count()) {
            output.stats.excluded += 1;
            continue;
        }
        if descriptor.compressed {
            output.stats.compressed += 1;
            continue;
        }
        if descriptor.size == 0 {
            output.stats.empty += 1;
            continue;
        }

        match decode_record(reader, descriptor)? {
            Some(DecodedRecord::NestedTable(tables)) => {
                output.stats.nested_tables += 1;
                output.tables.insert(descriptor.name(), tables);
            }
            Some(DecodedRecord::Caption(lines)) => {
                output.stats.captions += 1;
                output.captions.push((descriptor.id, lines));
            }
            Some(DecodedRecord::EventText(lines)) => {
                output.stats.event_texts += 1;
                output.talks.push((descriptor.id, lines));
            }
            Some(DecodedRecord::VoiceText(lines)) => {
                output.stats.voice_texts += 1;
                output.talks.push((descriptor.id, lines));
            }
            None => output.stats.ignored += 1,
        }
    }

    tracing::info!(
        "Scanned {} files: {} tables, {} captions, {} talks, {} ignored",
        output.stats.visited,
        output.stats.nested_tables,
        output.stats.captions,
        output.talks.len(),
        output.stats.ignored
    );
    Ok(output)
}

/// Classify one readable descriptor and decode it if it is text
///
/// Returns `None` for files that match no text signature.
pub fn decode_record<R: Read + Seek>(
    reader: &mut ArchiveReader<R>,
    descriptor: &FileDescriptor,
) -> Result<Option<DecodedRecord>> {
    let mut handle = reader.record(descriptor)?;
    let header = handle.read_header()?;
    let format = classify(&header);
    if format == SubFormat::None {
        return Ok(None);
    }

    let data = handle.read_all()?;
    let decoded = match format {
        SubFormat::NestedTable => DecodedRecord::NestedTable(parse_nested_table_bytes(&data)?),
        SubFormat::Caption => DecodedRecord::Caption(parse_caption_bytes(&data)?),
        SubFormat::EventTextPlain => DecodedRecord::EventText(parse_event_text_bytes(&data, &header)?),
        SubFormat::EventTextVoice => {
            if !is_voice_record(&data, &header) {
                tracing::trace!("File {} has no voice tag, ignoring", descriptor.id);
                return Ok(None);
            }
            DecodedRecord::VoiceText(parse_voice_text_bytes(&data, &header)?)
        }
        SubFormat::None => return Ok(None),
    };
    tracing::debug!("File {} decoded as {}", descriptor.id, format.as_str());
    Ok(Some(decoded))
}
