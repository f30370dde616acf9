//! Extraction settings
//!
//! The constants that tie the extractor to one particular game dump (index
//! locations, placeholder files, partition boundaries, the talk reorder) are
//! data, not logic. They ship as a bundled TOML file and can be overridden
//! section by section.

use std::path::Path;

use serde::Deserialize;

use crate::archive::ArchiveLayout;
use crate::corpus::LocaleSelection;
use crate::error::{Error, Result};

/// Bundled default settings
pub const DEFAULT_CONFIG: &str = include_str!("default.toml");

/// Complete extraction settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct ExtractConfig {
    pub layout: ArchiveLayout,
    pub exclusions: Exclusions,
    pub corpus: CorpusConfig,
}

impl ExtractConfig {
    /// Parse settings from TOML; missing sections keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.corpus.locales.validate()?;
        Ok(config)
    }

    /// Read settings from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| Error::resource(path, e))?;
        Self::from_toml_str(&source)
    }

    /// The bundled settings, parsed
    pub fn bundled() -> Result<Self> {
        Self::from_toml_str(DEFAULT_CONFIG)
    }
}

/// Files never decoded regardless of content
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Exclusions {
    /// Explicit file ids
    pub ids: Vec<u32>,
    /// Inclusive ranges of append indices
    pub append_ranges: Vec<(u32, u32)>,
}

impl Default for Exclusions {
    fn default() -> Self {
        Self {
            ids: vec![8659, 8660, 8761, 8762],
            append_ranges: vec![(16, 25), (215, 236), (243, 257)],
        }
    }
}

impl Exclusions {
    /// No exclusions at all
    #[must_use]
    pub fn none() -> Self {
        Self { ids: Vec::new(), append_ranges: Vec::new() }
    }

    /// Whether file `id` is a placeholder, given the primary table's file count
    #[must_use]
    pub fn contains(&self, id: u32, primary_file_count: usize) -> bool {
        if self.ids.contains(&id) {
            return true;
        }
        let Some(append_index) = (id as usize).checked_sub(primary_file_count) else {
            return false;
        };
        self.append_ranges
            .iter()
            .any(|&(start, end)| (start as usize..=end as usize).contains(&append_index))
    }
}

/// Settings for the alignment pass
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct CorpusConfig {
    pub locales: LocaleSelection,
    pub tables: TableFamilyConfig,
    pub captions: CaptionFamilyConfig,
    pub talks: TalkFamilyConfig,
}

/// Nested message tables to align
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TableFamilyConfig {
    /// Prefix joined with each name to form the table key
    pub key_prefix: String,
    pub names: Vec<String>,
    /// Placeholder texts meaning "not translated yet"
    pub untranslated_markers: Vec<String>,
}

impl Default for TableFamilyConfig {
    fn default() -> Self {
        Self {
            key_prefix: "common/common/".to_string(),
            names: [
                "msgdata",
                "scrdata",
                "scrdataDLC",
                "gwscrdata",
                "scrgwdataDLC",
                "tuscrdata",
                "btlscrdata",
                "btlscrdataDLC",
            ]
            .map(String::from)
            .to_vec(),
            untranslated_markers: vec!["iron_untranslated".to_string(), "未定".to_string()],
        }
    }
}

impl TableFamilyConfig {
    /// Keys of the allow-listed tables, in order
    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        self.names.iter().map(|name| format!("{}{name}", self.key_prefix))
    }
}

/// Caption partitioning
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CaptionFamilyConfig {
    pub key_prefix: String,
    /// File id opening the second caption group
    pub group_boundary_id: u32,
    /// Locale blocks per partition
    pub locale_blocks: usize,
}

impl Default for CaptionFamilyConfig {
    fn default() -> Self {
        Self {
            key_prefix: "common/common/caption/".to_string(),
            group_boundary_id: 29768,
            locale_blocks: 13,
        }
    }
}

/// Talk partitioning
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TalkFamilyConfig {
    pub key_prefix: String,
    pub reorder: Option<TalkReorder>,
}

impl Default for TalkFamilyConfig {
    fn default() -> Self {
        Self {
            key_prefix: "nx/event/talk_*/text/".to_string(),
            reorder: Some(TalkReorder::default()),
        }
    }
}

/// Move a contiguous run of appended talk files in front of another one
///
/// All three values are append indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TalkReorder {
    pub block_start: u32,
    pub block_end: u32,
    pub insert_before: u32,
}

impl Default for TalkReorder {
    fn default() -> Self {
        Self { block_start: 483, block_end: 526, insert_before: 373 }
    }
}
