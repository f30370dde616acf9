//! First-occurrence deduplication

use std::collections::HashSet;

use super::AlignedTuple;

/// Keys already kept by one alignment pass
#[derive(Debug, Clone, Default)]
pub struct DedupState {
    seen: HashSet<String>,
}

impl DedupState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key`; returns `false` if it was seen before
    pub fn insert(&mut self, key: String) -> bool {
        self.seen.insert(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

fn is_any_digit(c: char) -> bool {
    c.is_ascii_digit() || ('０'..='９').contains(&c)
}

/// Remove a trailing run of ASCII or full-width digits
#[must_use]
pub fn strip_trailing_digits(text: &str) -> &str {
    text.trim_end_matches(is_any_digit)
}

/// Cell key: each text with its trailing digits stripped, joined by newlines
#[must_use]
pub fn cell_key(tuple: &AlignedTuple) -> String {
    tuple.texts().each_ref().map(|text| strip_trailing_digits(text)).join("\n")
}

/// Key of a whole file's surviving tuples
///
/// Texts within a tuple are separated by NUL, tuples by newline.
pub fn collection_key<'a>(tuples: impl IntoIterator<Item = &'a AlignedTuple>) -> String {
    tuples
        .into_iter()
        .map(|tuple| tuple.texts().join("\0"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_trailing_digits() {
        assert_eq!(strip_trailing_digits("ネコ3"), "ネコ");
        assert_eq!(strip_trailing_digits("Cat 12"), "Cat ");
        assert_eq!(strip_trailing_digits("猫０９"), "猫");
        assert_eq!(strip_trailing_digits("1st place"), "1st place");
        assert_eq!(strip_trailing_digits("42"), "");
    }

    #[test]
    fn test_cell_key_ignores_numbering() {
        let a = AlignedTuple::new("ネコ3", "猫3", "Cat3");
        let b = AlignedTuple::new("ネコ7", "猫7", "Cat7");
        let c = AlignedTuple::new("イヌ5", "犬5", "Dog5");
        assert_eq!(cell_key(&a), "ネコ\n猫\nCat");
        assert_eq!(cell_key(&a), cell_key(&b));
        assert_ne!(cell_key(&a), cell_key(&c));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let mut state = DedupState::new();
        assert!(state.insert("a".to_string()));
        assert!(!state.insert("a".to_string()));
        assert!(state.insert("b".to_string()));
        assert!(state.contains("a"));
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_collection_key_keeps_digits_and_order() {
        let one = [AlignedTuple::new("a1", "b", "c"), AlignedTuple::new("d", "e", "f")];
        let two = [AlignedTuple::new("a2", "b", "c"), AlignedTuple::new("d", "e", "f")];
        assert_ne!(collection_key(&one), collection_key(&two));
        assert_eq!(collection_key(&one), "a1\0b\0c\nd\0e\0f");
        assert_eq!(collection_key(&[]), "");
    }
}
