//! Record access over the shared blob and standalone patch files

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::types::{FileDescriptor, FileSource};
use crate::error::{Error, Result};
use crate::formats::signature::{HEADER_SIZE, RawHeader};

/// Session reader: keeps the blob open for the whole scan
pub struct ArchiveReader<R: Read + Seek> {
    root: PathBuf,
    blob: BufReader<R>,
    blob_path: PathBuf,
}

impl ArchiveReader<File> {
    /// Open the blob at `root/blob`
    pub fn open(root: impl AsRef<Path>, blob: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let blob_path = root.join(blob.as_ref());
        let file = File::open(&blob_path).map_err(|e| Error::resource(&blob_path, e))?;
        Ok(Self::with_blob(root, file, blob_path))
    }
}

impl<R: Read + Seek> ArchiveReader<R> {
    /// Create a reader over an already opened blob
    pub fn with_blob(root: impl Into<PathBuf>, blob: R, blob_path: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            blob: BufReader::new(blob),
            blob_path: blob_path.into(),
        }
    }

    /// Acquire a handle for one record
    ///
    /// Standalone files are opened here and closed when the handle drops.
    pub fn record(&mut self, descriptor: &FileDescriptor) -> Result<RecordHandle<'_, R>> {
        let source = match &descriptor.source {
            FileSource::Blob { offset } => RecordSource::Blob { reader: &mut self.blob, offset: *offset },
            FileSource::Standalone { path } => {
                let full = self.root.join(path);
                let file = File::open(&full).map_err(|e| Error::resource(&full, e))?;
                RecordSource::Standalone { file: BufReader::new(file), path: full }
            }
        };
        Ok(RecordHandle {
            source,
            size: descriptor.size as usize,
            blob_path: &self.blob_path,
        })
    }
}

enum RecordSource<'a, R: Read + Seek> {
    Blob { reader: &'a mut BufReader<R>, offset: u64 },
    Standalone { file: BufReader<File>, path: PathBuf },
}

/// One record's bytes, addressed in its backing resource
pub struct RecordHandle<'a, R: Read + Seek> {
    source: RecordSource<'a, R>,
    size: usize,
    blob_path: &'a Path,
}

impl<R: Read + Seek> RecordHandle<'_, R> {
    /// Read the classification header
    ///
    /// Records shorter than the header are zero-padded.
    pub fn read_header(&mut self) -> Result<RawHeader> {
        let len = self.size.min(HEADER_SIZE);
        let mut bytes = [0u8; HEADER_SIZE];
        self.read_into(&mut bytes[..len])?;
        Ok(RawHeader::from_bytes(&bytes))
    }

    /// Read the whole record
    pub fn read_all(&mut self) -> Result<Vec<u8>> {
        let mut data = vec![0u8; self.size];
        self.read_into(&mut data)?;
        Ok(data)
    }

    fn read_into(&mut self, buf: &mut [u8]) -> Result<()> {
        match &mut self.source {
            RecordSource::Blob { reader, offset } => {
                let path = self.blob_path;
                reader
                    .seek(SeekFrom::Start(*offset))
                    .and_then(|_| reader.read_exact(buf))
                    .map_err(|e| Error::resource(path, e))
            }
            RecordSource::Standalone { file, path } => file
                .seek(SeekFrom::Start(0))
                .and_then(|_| file.read_exact(buf))
                .map_err(|e| Error::resource(path.as_path(), e)),
        }
    }
}
