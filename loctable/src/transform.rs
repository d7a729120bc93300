//! Character substitution for glyphs the target font cannot render.

use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use crate::types::LocalizationTable;

/// Replacements applied by [`CharacterMap::default`].
pub const DEFAULT_REPLACEMENTS: &[(char, char)] = &[
    ('«', '"'),
    ('»', '"'),
    ('µ', 'μ'),
    ('ґ', 'г'),
    ('Ґ', 'Г'),
    ('і', 'i'),
    ('І', 'I'),
    ('ї', 'ï'),
    ('Ї', 'Ï'),
    ('є', 'e'),
    ('Є', 'E'),
];

/// A one-to-one character replacement table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterMap {
    replacements: BTreeMap<char, char>,
}

impl Default for CharacterMap {
    fn default() -> Self {
        DEFAULT_REPLACEMENTS.iter().copied().collect()
    }
}

impl FromIterator<(char, char)> for CharacterMap {
    fn from_iter<I: IntoIterator<Item = (char, char)>>(iter: I) -> Self {
        Self {
            replacements: iter.into_iter().collect(),
        }
    }
}

impl CharacterMap {
    pub fn get(&self, character: char) -> Option<char> {
        self.replacements.get(&character).copied()
    }

    /// Returns the transformed text and the set of characters that were replaced,
    /// or `None` when nothing in `text` needs replacing.
    pub fn apply(&self, text: &str) -> Option<(String, BTreeSet<char>)> {
        if !text.chars().any(|c| self.replacements.contains_key(&c)) {
            return None;
        }
        let mut replaced = BTreeSet::new();
        let transformed = text
            .chars()
            .map(|c| match self.get(c) {
                Some(replacement) => {
                    replaced.insert(c);
                    replacement
                }
                None => c,
            })
            .collect();
        Some((transformed, replaced))
    }

    /// Applies the map to every value, keeping key order. Returns the new table
    /// and the number of values changed.
    pub fn transform_table(&self, table: &LocalizationTable) -> (LocalizationTable, usize) {
        let mut changed = 0;
        let mut output = LocalizationTable::new();
        for (key, value) in table.iter() {
            match self.apply(value) {
                Some((transformed, replaced)) => {
                    info!(
                        "replace characters in key: {} {}",
                        key,
                        replaced.iter().collect::<String>()
                    );
                    changed += 1;
                    output.set(key, transformed);
                }
                None => output.set(key, value),
            }
        }
        (output, changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_default_map() {
        let map = CharacterMap::default();
        let (text, replaced) = map.apply("«Їжак» ґанок є").unwrap();
        assert_eq!(text, "\"Ïжак\" ганок e");
        assert_eq!(replaced.into_iter().collect::<String>(), "«»Їєґ");
    }

    #[test]
    fn test_apply_without_matches() {
        assert_eq!(CharacterMap::default().apply("Привет, мир"), None);
    }

    #[test]
    fn test_transform_table_keeps_order() {
        let table: LocalizationTable = [("b", "ліс"), ("a", "plain"), ("c", "5µs")]
            .into_iter()
            .collect();
        let (output, changed) = CharacterMap::default().transform_table(&table);
        assert_eq!(changed, 2);
        assert_eq!(
            output.iter().collect::<Vec<_>>(),
            vec![("b", "лiс"), ("a", "plain"), ("c", "5μs")]
        );
    }

    #[test]
    fn test_custom_map() {
        let map: CharacterMap = [('x', 'y')].into_iter().collect();
        assert_eq!(map.get('x'), Some('y'));
        assert_eq!(map.apply("xx").map(|(t, _)| t), Some("yy".to_string()));
    }
}
