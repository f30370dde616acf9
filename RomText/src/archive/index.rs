//! Merging the primary file table with the patch indexes
//!
//! The primary table is a run of 32-byte records terminated by one extra
//! record. Patch A replaces descriptors in place, patch B appends new ones.

use std::fs;
use std::path::Path;

use super::types::{ArchiveLayout, FileDescriptor, FileSource};
use super::{
    PATCH_APPEND_RECORD_SIZE, PATCH_HEADER_SIZE, PATCH_PATH_LENGTH, PATCH_REPLACE_RECORD_SIZE,
    PRIMARY_RECORD_SIZE,
};
use crate::error::{Error, Result};
use crate::formats::bytes::{read_u32, read_u64};
use crate::formats::text::read_cstring_raw;
use crate::utils::normalize_path;

/// The merged, ordered file index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveIndex {
    descriptors: Vec<FileDescriptor>,
    primary_file_count: usize,
}

impl ArchiveIndex {
    /// Load and merge the index resources found under `root`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resource`] if an index file cannot be read, or an
    /// integrity error if the tables are inconsistent.
    pub fn load(root: impl AsRef<Path>, layout: &ArchiveLayout) -> Result<Self> {
        let root = root.as_ref();
        let read = |relative: &Path| {
            let path = root.join(relative);
            fs::read(&path).map_err(|e| Error::resource(path, e))
        };

        let primary = read(&layout.primary_table)?;
        let header = read(&layout.patch_header)?;
        let replace = read(&layout.patch_replace)?;
        let append = read(&layout.patch_append)?;

        let index = Self::from_tables(&primary, &header, &replace, &append, &layout.path_prefix)?;
        tracing::info!(
            "Loaded archive index: {} primary files, {} appended",
            index.primary_file_count,
            index.appended_count()
        );
        Ok(index)
    }

    /// Merge index resources already held in memory
    pub fn from_tables(
        primary: &[u8],
        patch_header: &[u8],
        patch_replace: &[u8],
        patch_append: &[u8],
        path_prefix: &str,
    ) -> Result<Self> {
        let mut descriptors = parse_primary(primary)?;
        let primary_file_count = descriptors.len();

        if patch_header.len() < PATCH_HEADER_SIZE {
            return Err(Error::IndexTooShort {
                resource: "patch header",
                expected: PATCH_HEADER_SIZE,
                found: patch_header.len(),
            });
        }
        let replace_count = read_u32(patch_header, 0, "patch replace count")? as usize;
        let append_count = read_u32(patch_header, 8, "patch append count")? as usize;

        check_table("patch replace table", patch_replace, replace_count, PATCH_REPLACE_RECORD_SIZE)?;
        check_table("patch append table", patch_append, append_count, PATCH_APPEND_RECORD_SIZE)?;

        for (record_index, record) in patch_replace
            .chunks_exact(PATCH_REPLACE_RECORD_SIZE)
            .take(replace_count)
            .enumerate()
        {
            let id = read_u32(record, 0, "patch replace id")?;
            let slot = descriptors
                .get_mut(id as usize)
                .ok_or(Error::FileIdOutOfRange { record: record_index, id, count: primary_file_count })?;

            *slot = FileDescriptor {
                id,
                source: FileSource::Standalone { path: patch_path(record, 0x20, path_prefix)? },
                size: read_u32(record, 8, "patch replace size")?,
                compressed: read_u32(record, 0x18, "patch replace flag")? != 0,
                append_index: None,
            };
        }

        for (append_index, record) in patch_append
            .chunks_exact(PATCH_APPEND_RECORD_SIZE)
            .take(append_count)
            .enumerate()
        {
            descriptors.push(FileDescriptor {
                id: (primary_file_count + append_index) as u32,
                source: FileSource::Standalone { path: patch_path(record, 0x18, path_prefix)? },
                size: read_u32(record, 0, "patch append size")?,
                compressed: read_u32(record, 0x10, "patch append flag")? != 0,
                append_index: Some(append_index as u32),
            });
        }

        Ok(Self { descriptors, primary_file_count })
    }

    /// All descriptors in id order
    #[must_use]
    pub fn descriptors(&self) -> &[FileDescriptor] {
        &self.descriptors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileDescriptor> {
        self.descriptors.iter()
    }

    #[must_use]
    pub fn get(&self, id: u32) -> Option<&FileDescriptor> {
        self.descriptors.get(id as usize)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Number of files described by the primary table
    #[must_use]
    pub fn primary_file_count(&self) -> usize {
        self.primary_file_count
    }

    /// Number of descriptors appended by the patch index
    #[must_use]
    pub fn appended_count(&self) -> usize {
        self.descriptors.len() - self.primary_file_count
    }

    /// File id of the descriptor at `append_index`
    #[must_use]
    pub fn appended_id(&self, append_index: u32) -> u32 {
        self.primary_file_count as u32 + append_index
    }
}

impl<'a> IntoIterator for &'a ArchiveIndex {
    type Item = &'a FileDescriptor;
    type IntoIter = std::slice::Iter<'a, FileDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}

fn parse_primary(data: &[u8]) -> Result<Vec<FileDescriptor>> {
    if data.len() % PRIMARY_RECORD_SIZE != 0 {
        return Err(Error::IndexLength {
            resource: "primary table",
            len: data.len(),
            record_size: PRIMARY_RECORD_SIZE,
        });
    }
    let record_count = data.len() / PRIMARY_RECORD_SIZE;
    if record_count == 0 {
        return Err(Error::MissingTerminator);
    }

    data.chunks_exact(PRIMARY_RECORD_SIZE)
        .take(record_count - 1)
        .enumerate()
        .map(|(id, record)| {
            Ok(FileDescriptor {
                id: id as u32,
                source: FileSource::Blob { offset: read_u64(record, 0, "primary offset")? },
                size: read_u32(record, 8, "primary size")?,
                compressed: read_u32(record, 0x18, "primary flag")? != 0,
                append_index: None,
            })
        })
        .collect()
}

fn check_table(resource: &'static str, data: &[u8], count: usize, record_size: usize) -> Result<()> {
    if data.len() % record_size != 0 {
        return Err(Error::IndexLength { resource, len: data.len(), record_size });
    }
    let expected = count.saturating_mul(record_size);
    if data.len() < expected {
        return Err(Error::IndexTooShort { resource, expected, found: data.len() });
    }
    Ok(())
}

fn patch_path(record: &[u8], at: usize, prefix: &str) -> Result<String> {
    let field_end = (at + PATCH_PATH_LENGTH).min(record.len());
    let raw = read_cstring_raw(&record[..field_end], at, "patch path")?;
    let path = raw.strip_prefix(prefix).unwrap_or(&raw);
    Ok(normalize_path(path))
}
