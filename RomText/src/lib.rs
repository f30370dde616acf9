//! # RomText
//!
//! Text extraction and cross-locale alignment for layered romfs game archives.
//!
//! ## Supported Formats
//!
//! - **Index tables** - The primary `DATA0.bin` table merged with the patch indexes
//! - **Nested tables** - Section/table/row/cell message tables, one section per locale
//! - **Captions** - Flat offset-array caption files
//! - **Event text** - Plain event scripts and voice-tagged scenario lines
//! - **Message tables** - Standalone `msgdata.bin` files
//!
//! ## Quick Start
//!
//! ### Extracting the Corpus
//!
//! ```no_run
//! // Index, scan and align with the bundled settings
//! let corpus = romtext::extract_corpus("romfs/")?;
//! println!("Extracted {} entries", corpus.len());
//! # Ok::<(), romtext::Error>(())
//! ```
//!
//! ### Custom Settings
//!
//! ```no_run
//! use romtext::prelude::*;
//!
//! let config = ExtractConfig::from_file("romtext.toml")?;
//! let extractor = Extractor::new("romfs/", config);
//! let index = extractor.load_index()?;
//! let scan = extractor.scan(&index)?;
//! println!("{} captions, {} talks", scan.captions.len(), scan.talks.len());
//! let corpus = extractor.align(&scan, &index)?;
//! # Ok::<(), romtext::Error>(())
//! ```
//!
//! The corpus serializes with any serde format; no writer is bundled.

pub mod archive;
pub mod config;
pub mod corpus;
pub mod error;
pub mod formats;
pub mod pipeline;
pub mod scan;
pub mod utils;

// Re-exports for convenience
pub use error::{Error, Result};
pub use pipeline::{Extractor, extract_corpus};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, ErrorCategory, Result};

    pub use crate::archive::{ArchiveIndex, ArchiveLayout, ArchiveReader, FileDescriptor, FileSource};
    pub use crate::config::{CorpusConfig, Exclusions, ExtractConfig};
    pub use crate::corpus::{
        AlignedTuple, Corpus, CorpusValue, Locale, LocaleSelection, RowValue, align_message_table, build_corpus,
    };
    pub use crate::formats::{MessageTableSet, StringTableSet, SubFormat, read_message_table};
    pub use crate::pipeline::{Extractor, extract_corpus};
    pub use crate::scan::{ScanOptions, ScanOutput, ScanProgress, ScanStats};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
