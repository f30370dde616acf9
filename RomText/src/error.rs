//! Error types for `RomText`

use std::path::PathBuf;

use thiserror::Error;

/// Broad failure class of an [`Error`].
///
/// Content that matches no known text format is not an error at all; the
/// dispatcher counts it as ignored and moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Index or record bytes are inconsistent with their declared layout.
    Integrity,
    /// A backing file could not be opened or read.
    Resource,
    /// Extraction settings could not be parsed.
    Config,
}

/// The error type for `RomText` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// A backing resource (index table, blob, or standalone file) could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Resource {
        /// The resource that failed.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    // ==================== Index Errors ====================
    /// An index resource is not a whole number of fixed-size records.
    #[error("{resource}: length {len} is not a multiple of record size {record_size:#x}")]
    IndexLength {
        /// Name of the index resource.
        resource: &'static str,
        /// Byte length found.
        len: usize,
        /// Expected record size.
        record_size: usize,
    },

    /// An index resource holds fewer records than its header declares.
    #[error("{resource}: expected at least {expected} bytes, found {found}")]
    IndexTooShort {
        /// Name of the index resource.
        resource: &'static str,
        /// Minimum byte length required.
        expected: usize,
        /// Byte length found.
        found: usize,
    },

    /// The primary table lacks its trailing terminator record.
    #[error("primary table has no terminator record")]
    MissingTerminator,

    /// A patch record replaces a file id outside the primary range.
    #[error("patch record {record} references file id {id}, primary table has {count} files")]
    FileIdOutOfRange {
        /// Index of the offending patch record.
        record: usize,
        /// The referenced file id.
        id: u32,
        /// Number of files in the primary table.
        count: usize,
    },

    // ==================== Record Errors ====================
    /// A record field or string points past the end of the record.
    #[error("{context}: offset {offset:#x} out of range (record is {len:#x} bytes)")]
    OffsetOutOfRange {
        /// What was being read.
        context: &'static str,
        /// The offending byte offset.
        offset: usize,
        /// Record length.
        len: usize,
    },

    // ==================== Corpus Errors ====================
    /// A declared partition boundary or reorder marker is absent from the scanned entries.
    #[error("{family}: declared boundary file id {id} not found among scanned entries")]
    PartitionBoundaryMissing {
        /// Text family being partitioned.
        family: &'static str,
        /// The missing file id.
        id: u32,
    },

    /// Declared boundaries produce overlapping or out-of-order partitions.
    #[error("{family}: partition boundaries out of order ({start} > {end})")]
    PartitionOrder {
        /// Text family being partitioned.
        family: &'static str,
        /// Start index of the partition.
        start: usize,
        /// End index of the partition.
        end: usize,
    },

    /// A partition does not split evenly into locale blocks.
    #[error("{family}: partition of {len} entries is not divisible into {blocks} locale blocks")]
    PartitionMisaligned {
        /// Text family being partitioned.
        family: &'static str,
        /// Number of entries in the partition.
        len: usize,
        /// Number of locale blocks expected.
        blocks: usize,
    },

    /// An allow-listed message table was not found in the archive.
    #[error("message table not found: {0}")]
    MissingTable(String),

    /// A message table lacks the section for a selected locale.
    #[error("message table {table}: no section for locale slot {slot}")]
    MissingLocaleSection {
        /// Table name.
        table: String,
        /// Missing locale slot.
        slot: usize,
    },

    /// The locale selection does not name three distinct locales.
    #[error("invalid locale selection: {0}")]
    InvalidLocaleSelection(String),

    // ==================== Config Errors ====================
    /// Extraction settings could not be parsed.
    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    /// Failure class of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Resource { .. } => ErrorCategory::Resource,
            Self::Config(_) => ErrorCategory::Config,
            _ => ErrorCategory::Integrity,
        }
    }

    /// Wrap an IO error with the path that produced it.
    pub(crate) fn resource(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Resource {
            path: path.into(),
            source,
        }
    }
}

/// A specialized Result type for `RomText` operations.
pub type Result<T> = std::result::Result<T, Error>;
