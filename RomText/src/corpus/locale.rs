//! The fixed locale enumeration and the three-way selection

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Game locales in block order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[serde(rename = "JPN")]
    Japanese,
    #[serde(rename = "ENG_U")]
    EnglishUs,
    #[serde(rename = "ENG_E")]
    EnglishEu,
    #[serde(rename = "GER")]
    German,
    #[serde(rename = "FRA_E")]
    FrenchEu,
    #[serde(rename = "FRA_U")]
    FrenchUs,
    #[serde(rename = "ESP_E")]
    SpanishEu,
    #[serde(rename = "ESP_U")]
    SpanishUs,
    #[serde(rename = "ITA")]
    Italian,
    #[serde(rename = "KOR")]
    Korean,
    #[serde(rename = "TWN")]
    ChineseTraditional,
    #[serde(rename = "CHN")]
    ChineseSimplified,
}

impl Locale {
    /// All locales in slot order
    pub const ALL: [Locale; 12] = [
        Self::Japanese,
        Self::EnglishUs,
        Self::EnglishEu,
        Self::German,
        Self::FrenchEu,
        Self::FrenchUs,
        Self::SpanishEu,
        Self::SpanishUs,
        Self::Italian,
        Self::Korean,
        Self::ChineseTraditional,
        Self::ChineseSimplified,
    ];

    /// Number of locales
    pub const COUNT: usize = Self::ALL.len();

    /// Position of this locale in block order
    #[must_use]
    pub fn slot(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_slot(slot: usize) -> Option<Self> {
        Self::ALL.get(slot).copied()
    }

    /// Short code used by the game files
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Japanese => "JPN",
            Self::EnglishUs => "ENG_U",
            Self::EnglishEu => "ENG_E",
            Self::German => "GER",
            Self::FrenchEu => "FRA_E",
            Self::FrenchUs => "FRA_U",
            Self::SpanishEu => "ESP_E",
            Self::SpanishUs => "ESP_U",
            Self::Italian => "ITA",
            Self::Korean => "KOR",
            Self::ChineseTraditional => "TWN",
            Self::ChineseSimplified => "CHN",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.code() == code)
    }
}

/// The three locales a corpus aligns
///
/// `comparison` is the locale checked against `target` to detect text that
/// was never translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleSelection {
    pub source: Locale,
    pub comparison: Locale,
    pub target: Locale,
}

impl Default for LocaleSelection {
    fn default() -> Self {
        Self {
            source: Locale::Japanese,
            comparison: Locale::ChineseSimplified,
            target: Locale::EnglishUs,
        }
    }
}

impl LocaleSelection {
    /// Selected slots in tuple order
    #[must_use]
    pub fn slots(&self) -> [usize; 3] {
        [self.source.slot(), self.comparison.slot(), self.target.slot()]
    }

    /// Reject selections that name the same locale twice
    pub fn validate(&self) -> Result<()> {
        let [a, b, c] = [self.source, self.comparison, self.target];
        if a == b || a == c || b == c {
            return Err(Error::InvalidLocaleSelection(format!(
                "{} / {} / {} must be distinct",
                a.code(),
                b.code(),
                c.code()
            )));
        }
        Ok(())
    }
}
