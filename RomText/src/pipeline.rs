//! End-to-end extraction: index, scan, align

use std::path::{Path, PathBuf};

use crate::archive::ArchiveIndex;
use crate::config::ExtractConfig;
use crate::corpus::{Corpus, build_corpus};
use crate::error::Result;
use crate::scan::{ProgressCallback, ScanOptions, ScanOutput, scan_archive_with_progress};

/// Extracts the text corpus from one archive dump
#[derive(Debug, Clone)]
pub struct Extractor {
    root: PathBuf,
    config: ExtractConfig,
}

impl Extractor {
    /// Extractor for the archive rooted at `root`
    pub fn new(root: impl Into<PathBuf>, config: ExtractConfig) -> Self {
        Self { root: root.into(), config }
    }

    /// Extractor using the bundled settings
    ///
    /// # Errors
    /// Returns an error if the bundled settings fail to parse.
    pub fn bundled(root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(root, ExtractConfig::bundled()?))
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Load and merge the index tables
    pub fn load_index(&self) -> Result<ArchiveIndex> {
        ArchiveIndex::load(&self.root, &self.config.layout)
    }

    /// Decode every text record listed in `index`
    pub fn scan(&self, index: &ArchiveIndex) -> Result<ScanOutput> {
        self.scan_with_progress(index, &|_| {})
    }

    /// Decode every text record, reporting progress per descriptor
    pub fn scan_with_progress(&self, index: &ArchiveIndex, progress: ProgressCallback) -> Result<ScanOutput> {
        let options = ScanOptions { exclusions: self.config.exclusions.clone() };
        scan_archive_with_progress(&self.root, index, &self.config.layout, &options, progress)
    }

    /// Align a finished scan into the corpus
    pub fn align(&self, scan: &ScanOutput, index: &ArchiveIndex) -> Result<Corpus> {
        build_corpus(scan, index, &self.config.corpus)
    }

    /// Run every stage and return the corpus
    ///
    /// # Errors
    /// Returns the first index, read, decode or alignment error; nothing
    /// partial is returned.
    pub fn run(&self) -> Result<Corpus> {
        tracing::info!("Extracting text from {}", self.root.display());
        let index = self.load_index()?;
        let scan = self.scan(&index)?;
        self.align(&scan, &index)
    }
}

/// Extract the corpus from `root` with the bundled settings
pub fn extract_corpus(root: impl AsRef<Path>) -> Result<Corpus> {
    Extractor::bundled(root.as_ref())?.run()
}
