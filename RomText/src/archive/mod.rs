//! Layered archive index and record access
//!
//! A romfs dump stores most files in one data blob addressed by a primary
//! table. Patches add two more index resources: one replacing existing
//! entries with standalone files, one appending new standalone files.

mod index;
mod reader;
mod types;

pub use index::ArchiveIndex;
pub use reader::{ArchiveReader, RecordHandle};
pub use types::*;

/// Size of a primary table record
pub const PRIMARY_RECORD_SIZE: usize = 0x20;

/// Size of a replacement patch record
pub const PATCH_REPLACE_RECORD_SIZE: usize = 0x120;

/// Size of an appended patch record
pub const PATCH_APPEND_RECORD_SIZE: usize = 0x118;

/// Minimum length of the patch header (two counts at +0 and +8)
pub const PATCH_HEADER_SIZE: usize = 12;

/// Length of the path field in patch records
pub const PATCH_PATH_LENGTH: usize = 0x100;

#[cfg(test)]
pub(crate) use index::tests as fixtures;
