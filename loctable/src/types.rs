//! Core, format-agnostic types for loctable.
//! Loaders decode into these; writers serialize these.

use std::collections::{HashMap, HashSet};

/// A single `key=value` localization entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// An ordered `key -> value` localization table.
///
/// Keys are unique. Insertion order is the output order of every writer; assigning
/// to an existing key replaces its value without moving it.
#[derive(Debug, Clone, Default)]
pub struct LocalizationTable {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl LocalizationTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&position| self.entries[position].value.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Inserts or replaces the value for `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&position) => self.entries[position].value = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push(Entry { key, value });
            }
        }
    }

    /// Keys in table order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Keys as an unordered set, for set-like comparisons between tables.
    pub fn key_set(&self) -> HashSet<&str> {
        self.keys().collect()
    }

    /// `(key, value)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|e| (e.key.as_str(), e.value.as_str()))
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copies every entry of `other` into this table: existing keys are
    /// overwritten in place, new keys are appended in `other`'s order.
    pub fn merge_from(&mut self, other: &LocalizationTable) {
        for (key, value) in other.iter() {
            self.set(key, value);
        }
    }
}

impl PartialEq for LocalizationTable {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for LocalizationTable {}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocalizationTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = LocalizationTable::new();
        table.extend(iter);
        table
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for LocalizationTable {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl IntoIterator for LocalizationTable {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Translated/total key counts for a translation table measured against its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationStats {
    pub translated: usize,
    pub total: usize,
}

impl TranslationStats {
    pub fn new(original: &LocalizationTable, translation: &LocalizationTable) -> Self {
        Self {
            translated: translation.len(),
            total: original.len(),
        }
    }

    pub fn left(&self) -> usize {
        self.total.saturating_sub(self.translated)
    }

    /// Percentage of translated keys, `None` for an empty source.
    pub fn percent(&self) -> Option<f64> {
        (self.total > 0).then(|| self.translated as f64 / self.total as f64 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_preserves_position_on_overwrite() {
        let mut table = LocalizationTable::new();
        table.set("a", "1");
        table.set("b", "2");
        table.set("a", "3");
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(table.get("a"), Some("3"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_lookup_missing_key() {
        let table: LocalizationTable = [("a", "1")].into_iter().collect();
        assert!(table.contains("a"));
        assert!(!table.contains("b"));
        assert_eq!(table.get("b"), None);
    }

    #[test]
    fn test_merge_from_overwrites_and_appends() {
        let mut base: LocalizationTable = [("a", "1"), ("b", "2")].into_iter().collect();
        let extra: LocalizationTable = [("c", "3"), ("a", "9")].into_iter().collect();
        base.merge_from(&extra);
        assert_eq!(
            base.iter().collect::<Vec<_>>(),
            vec![("a", "9"), ("b", "2"), ("c", "3")]
        );
    }

    #[test]
    fn test_key_set() {
        let table: LocalizationTable = [("x", ""), ("y", "")].into_iter().collect();
        let keys = table.key_set();
        assert!(keys.contains("x") && keys.contains("y"));
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn test_equality_ignores_construction_path() {
        let mut built = LocalizationTable::new();
        built.set("k", "old");
        built.set("k", "new");
        let collected: LocalizationTable = [("k", "new")].into_iter().collect();
        assert_eq!(built, collected);
    }

    #[test]
    fn test_entry_display() {
        assert_eq!(Entry::new("key", "a=b").to_string(), "key=a=b");
    }

    #[test]
    fn test_translation_stats() {
        let original: LocalizationTable = [("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")]
            .into_iter()
            .collect();
        let translation: LocalizationTable = [("a", "x")].into_iter().collect();
        let stats = TranslationStats::new(&original, &translation);
        assert_eq!(stats.left(), 3);
        assert_eq!(stats.percent(), Some(25.0));
        assert_eq!(
            TranslationStats::new(&LocalizationTable::new(), &translation).percent(),
            None
        );
    }
}
