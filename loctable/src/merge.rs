//! Three-way merge of reference, original and translation tables.
//!
//! The reference is the current source text, the original is the source text the
//! translation was made against. Assembly walks the reference (or the original when
//! no reference is available) and decides the output value key by key.

use std::{
    collections::BTreeSet,
    fs,
    path::Path,
};

use serde::Serialize;
use tracing::{info, warn};

use crate::{error::Error, placeholder::formats_equivalent, types::LocalizationTable};

/// Keys whose reference value is always kept.
pub const DEFAULT_EXCLUDED_KEYS: &[&str] = &["mobiGlas_ui_notification_Party_Title"];

/// Keys that receive the version suffix.
pub const DEFAULT_VERSION_KEYS: &[&str] = &["pause_ForegroundMainMenuScreenName"];

/// How a merged value was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeDecision {
    /// Source text unchanged; translation kept.
    Unchanged,
    /// Source text changed with compatible placeholders; translation kept.
    Outdated,
    /// Translation not trusted; reference kept.
    Reference,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub value: String,
    pub decision: MergeDecision,
}

/// Per-key reconciliation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreeWayMerger {
    pub allow_outdated: bool,
}

impl Default for ThreeWayMerger {
    fn default() -> Self {
        Self {
            allow_outdated: true,
        }
    }
}

impl ThreeWayMerger {
    pub fn new(allow_outdated: bool) -> Self {
        Self { allow_outdated }
    }

    /// Chooses the value for `key`.
    ///
    /// 1. `reference == original`: the translation is current.
    /// 2. Outdated translations allowed and `reference`/`original` placeholders
    ///    equivalent: the translation is reused.
    /// 3. Otherwise the reference text is used.
    ///
    /// A missing `original` can never establish equivalence and falls to case 3.
    pub fn merge(
        &self,
        key: &str,
        reference: &str,
        original: Option<&str>,
        translation: &str,
    ) -> MergeOutcome {
        let decision = match original {
            Some(original) if original == reference => MergeDecision::Unchanged,
            Some(original) if self.allow_outdated && formats_equivalent(reference, original) => {
                warn!("outdated translation key used: {}", key);
                MergeDecision::Outdated
            }
            _ => {
                warn!("reference key used: {}", key);
                MergeDecision::Reference
            }
        };
        let value = match decision {
            MergeDecision::Reference => reference,
            MergeDecision::Unchanged | MergeDecision::Outdated => translation,
        };
        MergeOutcome {
            value: value.to_string(),
            decision,
        }
    }
}

/// Rules layered over the per-key merge during assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleOptions {
    pub merger: ThreeWayMerger,
    /// Keys never taken from the translation.
    pub excluded_keys: BTreeSet<String>,
    /// Key prefixes never taken from the translation.
    pub excluded_prefixes: Vec<String>,
    /// Keys that get `" - v<version>"` appended.
    pub version_keys: BTreeSet<String>,
    pub version: Option<String>,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            merger: ThreeWayMerger::default(),
            excluded_keys: DEFAULT_EXCLUDED_KEYS.iter().map(|k| k.to_string()).collect(),
            excluded_prefixes: Vec::new(),
            version_keys: DEFAULT_VERSION_KEYS.iter().map(|k| k.to_string()).collect(),
            version: None,
        }
    }
}

impl AssembleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allow_outdated(mut self, allow: bool) -> Self {
        self.merger.allow_outdated = allow;
        self
    }

    /// Adds keys to the fixed exclusion set.
    pub fn with_excluded_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn with_excluded_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_prefixes
            .extend(prefixes.into_iter().map(Into::into));
        self
    }

    /// Sets the version; an empty string means no version.
    pub fn with_version(mut self, version: Option<impl Into<String>>) -> Self {
        self.version = version.map(Into::into).filter(|v: &String| !v.is_empty());
        self
    }

    /// Whether the translation of `key` may be used at all.
    pub fn is_translatable(&self, key: &str) -> bool {
        if self.excluded_keys.contains(key) {
            info!("exclude translate key: {}", key);
            return false;
        }
        if self
            .excluded_prefixes
            .iter()
            .any(|prefix| key.starts_with(prefix.as_str()))
        {
            info!("exclude prefixed key: {}", key);
            return false;
        }
        true
    }

    fn apply_version(&self, key: &str, value: String) -> String {
        match &self.version {
            Some(version) if self.version_keys.contains(key) => {
                info!("Added version to key: {}", key);
                format!("{value} - v{version}")
            }
            _ => value,
        }
    }
}

/// Counters of one assembly run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub unchanged: usize,
    pub outdated: usize,
    pub reference_used: usize,
    pub excluded: usize,
    pub untranslated: usize,
}

impl MergeReport {
    fn record(&mut self, decision: MergeDecision) {
        match decision {
            MergeDecision::Unchanged => self.unchanged += 1,
            MergeDecision::Outdated => self.outdated += 1,
            MergeDecision::Reference => self.reference_used += 1,
        }
    }
}

/// Builds the final table.
///
/// With a `reference`, every reference key is emitted in reference order; keys
/// that have a translation and are translatable go through the three-way merge,
/// all others keep the reference value. Without a reference, the `original` is
/// walked instead and translations are taken verbatim.
///
/// Version suffixes are applied last, once per key.
pub fn assemble(
    reference: Option<&LocalizationTable>,
    original: &LocalizationTable,
    translation: &LocalizationTable,
    options: &AssembleOptions,
) -> (LocalizationTable, MergeReport) {
    let mut output = LocalizationTable::new();
    let mut report = MergeReport::default();
    let base = reference.unwrap_or(original);
    for (key, value) in base.iter() {
        let merged = match translation.get(key) {
            Some(translated) if options.is_translatable(key) => match reference {
                Some(_) => {
                    let outcome =
                        options
                            .merger
                            .merge(key, value, original.get(key), translated);
                    report.record(outcome.decision);
                    outcome.value
                }
                None => {
                    report.record(MergeDecision::Unchanged);
                    translated.to_string()
                }
            },
            Some(_) => {
                report.excluded += 1;
                value.to_string()
            }
            None => {
                report.untranslated += 1;
                value.to_string()
            }
        };
        output.set(key, options.apply_version(key, merged));
    }
    (output, report)
}

/// Extracts the translations that are still valid against `reference`.
///
/// Walks `reference` and keeps `translation[key]` only where the translation
/// exists and `original[key]` equals the reference value.
pub fn build_import(
    reference: &LocalizationTable,
    original: &LocalizationTable,
    translation: &LocalizationTable,
) -> LocalizationTable {
    reference
        .iter()
        .filter(|(key, value)| original.get(key) == Some(*value))
        .filter_map(|(key, _)| translation.get(key).map(|translated| (key, translated)))
        .collect()
}

/// Reads a key-prefix list: one prefix per line, blank lines skipped.
pub fn read_prefix_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>, Error> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(|line| line.trim_matches(['\r', '\u{feff}']))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
