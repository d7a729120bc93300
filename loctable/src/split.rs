//! Routing of translation keys into split documents by key prefix.
//!
//! A split configuration declares documents in order, each with a list of key
//! prefixes. A key belongs to the first declared prefix it starts with; keys that
//! match no prefix stay in the main document.

use crate::{error::Error, types::LocalizationTable};

const PREFIX_SEPARATOR: char = ',';

/// Ordered document names plus an ordered `prefix -> document` routing list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitConfig {
    documents: Vec<String>,
    prefixes: Vec<(String, String)>,
}

impl SplitConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a configuration from `(document, "PREFIX_A, PREFIX_B")` entries,
    /// in declaration order.
    ///
    /// # Example
    /// ```rust
    /// use loctable::SplitConfig;
    /// let config = SplitConfig::from_entries([("ui", "UI_, Menu_"), ("hud", "HUD_")]).unwrap();
    /// assert_eq!(config.route("HUD_Speed"), Some("hud"));
    /// assert_eq!(config.route("item_name"), None);
    /// ```
    pub fn from_entries<I, D, P>(entries: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (D, P)>,
        D: AsRef<str>,
        P: AsRef<str>,
    {
        let mut config = SplitConfig::new();
        for (document, prefixes) in entries {
            config.add_document(document.as_ref(), prefixes.as_ref().split(PREFIX_SEPARATOR))?;
        }
        Ok(config)
    }

    /// Declares `document` and routes every prefix in `prefixes` to it.
    ///
    /// Prefixes are trimmed; empty ones are ignored. A prefix that was already
    /// declared is re-pointed to `document` but keeps its original position.
    pub fn add_document<I, S>(&mut self, document: &str, prefixes: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let document = document.trim();
        if document.is_empty() {
            return Err(Error::config_error("empty split document name"));
        }
        if !self.documents.iter().any(|d| d == document) {
            self.documents.push(document.to_string());
        }
        for prefix in prefixes {
            let prefix = prefix.as_ref().trim();
            if prefix.is_empty() {
                continue;
            }
            match self.prefixes.iter_mut().find(|(p, _)| p == prefix) {
                Some((_, routed)) => *routed = document.to_string(),
                None => self
                    .prefixes
                    .push((prefix.to_string(), document.to_string())),
            }
        }
        Ok(())
    }

    /// Document names in declaration order.
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    /// `(prefix, document)` pairs in matching order.
    pub fn prefixes(&self) -> &[(String, String)] {
        &self.prefixes
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// The document `key` is routed to. First declared matching prefix wins,
    /// not the longest one.
    pub fn route(&self, key: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|(prefix, _)| key.starts_with(prefix.as_str()))
            .map(|(_, document)| document.as_str())
    }

    /// Fans `table` out into the main table and one table per declared document.
    ///
    /// Every document appears in the result, in declaration order, even when no
    /// key is routed to it. Relative key order is preserved within each table.
    pub fn split(&self, table: &LocalizationTable) -> SplitTables {
        let mut documents: Vec<(String, LocalizationTable)> = self
            .documents
            .iter()
            .map(|name| (name.clone(), LocalizationTable::new()))
            .collect();
        let mut main = LocalizationTable::new();
        for (key, value) in table.iter() {
            let target = self
                .route(key)
                .and_then(|name| documents.iter_mut().find(|(d, _)| d == name));
            match target {
                Some((_, document)) => document.set(key, value),
                None => main.set(key, value),
            }
        }
        SplitTables { main, documents }
    }
}

/// Result of [`SplitConfig::split`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitTables {
    pub main: LocalizationTable,
    pub documents: Vec<(String, LocalizationTable)>,
}

impl SplitTables {
    pub fn document(&self, name: &str) -> Option<&LocalizationTable> {
        self.documents
            .iter()
            .find(|(document, _)| document == name)
            .map(|(_, table)| table)
    }
}
