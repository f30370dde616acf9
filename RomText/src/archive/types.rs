//! Types for the layered archive index

use std::path::PathBuf;

/// Where a file's bytes live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// Inside the shared data blob at this byte offset
    Blob { offset: u64 },
    /// A standalone file, relative to the archive root
    Standalone { path: String },
}

/// Resolved location and size of one logical file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// File id; equals the descriptor's position in the merged index
    pub id: u32,
    pub source: FileSource,
    pub size: u32,
    pub compressed: bool,
    /// Position among patch-appended descriptors, `None` for primary ids
    pub append_index: Option<u32>,
}

impl FileDescriptor {
    /// Standalone path, if the file is not in the blob
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match &self.source {
            FileSource::Standalone { path } => Some(path),
            FileSource::Blob { .. } => None,
        }
    }

    /// Byte offset of the record within its backing resource
    #[must_use]
    pub fn offset(&self) -> u64 {
        match self.source {
            FileSource::Blob { offset } => offset,
            FileSource::Standalone { .. } => 0,
        }
    }

    /// Display name used for keyed outputs
    ///
    /// Standalone files drop their leading patch directory and extension
    /// (`patch4/common/common/msgdata.bin` → `common/common/msgdata`); blob
    /// files are named `#<id>`.
    #[must_use]
    pub fn name(&self) -> String {
        match &self.source {
            FileSource::Standalone { path } => {
                let without_root = path.split_once('/').map_or(path.as_str(), |(_, rest)| rest);
                without_root
                    .rsplit_once('.')
                    .filter(|(_, ext)| !ext.contains('/'))
                    .map_or(without_root, |(stem, _)| stem)
                    .to_string()
            }
            FileSource::Blob { .. } => format!("#{}", self.id),
        }
    }

    /// Whether the dispatcher should look at this file at all
    #[must_use]
    pub fn is_readable(&self) -> bool {
        self.size != 0 && !self.compressed
    }
}

/// Relative locations of the index resources under the archive root
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct ArchiveLayout {
    /// Primary fixed-record file table
    pub primary_table: PathBuf,
    /// Shared data blob addressed by primary offsets
    pub data_blob: PathBuf,
    /// Patch header holding both patch counts
    pub patch_header: PathBuf,
    /// Replacement records
    pub patch_replace: PathBuf,
    /// Appended records
    pub patch_append: PathBuf,
    /// Scheme prefix stripped from patch paths (e.g. `rom:/`)
    pub path_prefix: String,
}

impl Default for ArchiveLayout {
    fn default() -> Self {
        Self {
            primary_table: PathBuf::from("DATA0.bin"),
            data_blob: PathBuf::from("DATA1.bin"),
            patch_header: PathBuf::from("patch4/INFO2.bin"),
            patch_replace: PathBuf::from("patch4/INFO0.bin"),
            patch_append: PathBuf::from("patch4/info1.bin"),
            path_prefix: "rom:/".to_string(),
        }
    }
}
