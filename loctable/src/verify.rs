//! Structural checks of a translation table against its original.
//!
//! Hard checks (empty translation, disallowed characters, placeholder changes) go
//! through the run's [`ErrorPolicy`]. Heuristic checks (lost newline, space before
//! newline, untranslated English words) only produce [`VerifyNote`]s.

use std::{
    collections::{BTreeSet, HashSet},
    fmt,
    fs,
    path::Path,
};

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::{
    error::Error,
    placeholder::{
        NamedFormat, clean_text, english_words, is_named_format_equals, named_formats,
        render_named, render_unnamed, sorted_unnamed_formats, tokens,
    },
    policy::ErrorPolicy,
    types::LocalizationTable,
};

lazy_static! {
    static ref LOST_NEWLINE_REGEX: Regex = Regex::new(r"[^\\]\\[^n\\]").unwrap();
}

const SPACE_BEFORE_NEWLINE: &str = r" \n";

/// Keys with these prefixes are not subject to the unnamed-placeholder check.
const UNNAMED_FORMAT_EXEMPT_PREFIXES: &[&str] = &["PU_", "PH_PU_", "DXSM_"];

/// Characters that are always allowed once an allow-list is in use.
const ALWAYS_ALLOWED: &[char] = &[' ', '\t'];

const CODEPOINT_PREFIX: &str = r"\u";
const CODEPOINT_DIGITS: usize = 4;

const TRUTHY_VALUES: &[&str] = &["true", "True", "1"];

/// Setting names understood by [`VerifyOptions::from_settings`].
pub const LOST_NEWLINE_SETTING: &str = "lost_newline";
pub const SPACE_BEFORE_NEWLINE_SETTING: &str = "space_before_newline";
pub const ENGLISH_WORDS_MISMATCH_SETTING: &str = "english_words_mismatch";
pub const ALLOWED_CHARACTERS_FILE_SETTING: &str = "allowed_characters_file";

/// A failed hard check for one key.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VerifyIssue {
    #[error("empty translation - {key}")]
    EmptyTranslation { key: String },

    #[error("invalid characters in - {key}: {}", render_characters(.characters))]
    InvalidCharacters {
        key: String,
        characters: BTreeSet<char>,
    },

    #[error(
        "unnamed format seq change - {key} (original: {}, translation: {})",
        render_unnamed(.original),
        render_unnamed(.translation)
    )]
    UnnamedFormatChanged {
        key: String,
        original: Vec<String>,
        translation: Vec<String>,
    },

    #[error(
        "named format seq change - {key} (original: {}, translation: {})",
        render_named(.original),
        render_named(.translation)
    )]
    NamedFormatChanged {
        key: String,
        original: BTreeSet<NamedFormat>,
        translation: BTreeSet<NamedFormat>,
    },
}

impl VerifyIssue {
    pub fn key(&self) -> &str {
        match self {
            VerifyIssue::EmptyTranslation { key }
            | VerifyIssue::InvalidCharacters { key, .. }
            | VerifyIssue::UnnamedFormatChanged { key, .. }
            | VerifyIssue::NamedFormatChanged { key, .. } => key,
        }
    }
}

fn render_characters(characters: &BTreeSet<char>) -> String {
    characters
        .iter()
        .map(|c| format!("{c:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// An informational finding. Never fails a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VerifyNote {
    LostNewline {
        key: String,
        count: usize,
    },
    SpaceBeforeNewline {
        key: String,
        count: usize,
    },
    UndefinedWords {
        key: String,
        original: BTreeSet<String>,
        translation: BTreeSet<String>,
        extra: BTreeSet<String>,
    },
}

impl fmt::Display for VerifyNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyNote::LostNewline { key, count } => {
                write!(f, r"lost newline \n [{count}] - {key}")
            }
            VerifyNote::SpaceBeforeNewline { key, count } => {
                write!(f, r"space before \n [{count}] - {key}")
            }
            VerifyNote::UndefinedWords { key, extra, .. } => write!(
                f,
                "use undefined word in - {key}: {}",
                extra.iter().cloned().collect::<Vec<_>>().join(", ")
            ),
        }
    }
}

/// Everything a verification run found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub issues: Vec<VerifyIssue>,
    pub notes: Vec<VerifyNote>,
}

impl VerifyReport {
    /// No hard check failed. Notes do not count.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Which optional checks run, and the allowed-character list if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyOptions {
    pub lost_newline: bool,
    pub space_before_newline: bool,
    pub english_words_mismatch: bool,
    /// `None` disables the allowed-character check.
    pub allowed_characters: Option<HashSet<char>>,
}

impl VerifyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lost_newline(mut self, enabled: bool) -> Self {
        self.lost_newline = enabled;
        self
    }

    pub fn with_space_before_newline(mut self, enabled: bool) -> Self {
        self.space_before_newline = enabled;
        self
    }

    pub fn with_english_words_mismatch(mut self, enabled: bool) -> Self {
        self.english_words_mismatch = enabled;
        self
    }

    /// Sets the allow-list. An empty set disables the check.
    pub fn with_allowed_characters(mut self, characters: HashSet<char>) -> Self {
        self.allowed_characters = (!characters.is_empty()).then_some(characters);
        self
    }

    /// Builds options from string settings such as a `[verify]` config section.
    ///
    /// Flags are on only for `true`, `True` or `1`. `allowed_characters_file` is
    /// read when it names an existing file; otherwise the allow-list stays off.
    /// Unknown settings are ignored.
    pub fn from_settings<I, K, V>(settings: I, policy: &ErrorPolicy) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut options = VerifyOptions::new();
        for (name, value) in settings {
            let value = value.as_ref();
            match name.as_ref() {
                LOST_NEWLINE_SETTING => options.lost_newline = is_truthy(value),
                SPACE_BEFORE_NEWLINE_SETTING => options.space_before_newline = is_truthy(value),
                ENGLISH_WORDS_MISMATCH_SETTING => {
                    options.english_words_mismatch = is_truthy(value)
                }
                ALLOWED_CHARACTERS_FILE_SETTING => {
                    let path = Path::new(value);
                    if path.is_file() {
                        info!("Read allowed characters: {}", path.display());
                        options = options.with_allowed_characters(read_codepoint_file(path, policy)?);
                    }
                }
                _ => {}
            }
        }
        Ok(options)
    }
}

/// Whether a setting value means "enabled".
pub fn is_truthy(value: &str) -> bool {
    TRUTHY_VALUES.contains(&value)
}

/// Reads an allowed-codepoint list: back-to-back `\uXXXX` escapes, nothing else.
///
/// Trailing line breaks are tolerated. A malformed list is reported through
/// `policy`; in lenient mode it yields an empty set, which disables the check.
pub fn read_codepoint_file<P: AsRef<Path>>(
    path: P,
    policy: &ErrorPolicy,
) -> Result<HashSet<char>, Error> {
    let content = fs::read_to_string(path)?;
    match parse_codepoints(content.trim_end_matches(['\r', '\n'])) {
        Ok(characters) => Ok(characters),
        Err(error) => {
            policy.report(error)?;
            Ok(HashSet::new())
        }
    }
}

fn parse_codepoints(content: &str) -> Result<HashSet<char>, Error> {
    let mut characters: HashSet<char> = ALWAYS_ALLOWED.iter().copied().collect();
    let mut rest = content;
    while !rest.is_empty() {
        let Some(after_prefix) = rest.strip_prefix(CODEPOINT_PREFIX) else {
            let prefix: String = rest.chars().take(CODEPOINT_PREFIX.len()).collect();
            return Err(Error::MalformedCodepoint(format!(
                "invalid codepoint prefix: {prefix}"
            )));
        };
        let digits = after_prefix
            .get(..CODEPOINT_DIGITS)
            .filter(|digits| digits.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| Error::MalformedCodepoint("missing codepoint".to_string()))?;
        let character = u32::from_str_radix(digits, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| {
                Error::MalformedCodepoint(format!("not a character: {CODEPOINT_PREFIX}{digits}"))
            })?;
        characters.insert(character);
        rest = &after_prefix[CODEPOINT_DIGITS..];
    }
    Ok(characters)
}

/// Runs the configured checks over a table pair.
#[derive(Debug, Clone, Default)]
pub struct TranslationVerifier {
    options: VerifyOptions,
    policy: ErrorPolicy,
}

impl TranslationVerifier {
    pub fn new(options: VerifyOptions, policy: ErrorPolicy) -> Self {
        Self { options, policy }
    }

    pub fn options(&self) -> &VerifyOptions {
        &self.options
    }

    /// Checks every key of `original` that also has a translation.
    ///
    /// In strict mode the first hard failure is returned as [`Error::Verify`].
    /// In lenient mode failures are logged and collected into the report.
    pub fn verify(
        &self,
        original: &LocalizationTable,
        translation: &LocalizationTable,
    ) -> Result<VerifyReport, Error> {
        let mut report = VerifyReport::default();
        for (key, value) in original.iter() {
            let Some(translated) = translation.get(key) else {
                continue;
            };
            for issue in self.check_entry(key, value, translated) {
                self.policy.report(Error::Verify(issue.clone()))?;
                report.issues.push(issue);
            }
            for note in self.notes_for(key, value, translated) {
                info!("Note: {}", note);
                report.notes.push(note);
            }
        }
        Ok(report)
    }

    fn check_entry(&self, key: &str, value: &str, translated: &str) -> Vec<VerifyIssue> {
        if translated.is_empty() && !value.is_empty() {
            return vec![VerifyIssue::EmptyTranslation {
                key: key.to_string(),
            }];
        }

        let mut issues = Vec::new();
        if let Some(allowed) = &self.options.allowed_characters {
            let characters: BTreeSet<char> = translated
                .chars()
                .filter(|c| !allowed.contains(c) && !value.contains(*c))
                .collect();
            if !characters.is_empty() {
                issues.push(VerifyIssue::InvalidCharacters {
                    key: key.to_string(),
                    characters,
                });
            }
        }

        if !is_unnamed_format_exempt(key) {
            let original = sorted_unnamed_formats(value);
            let translation = sorted_unnamed_formats(translated);
            if original != translation {
                issues.push(VerifyIssue::UnnamedFormatChanged {
                    key: key.to_string(),
                    original,
                    translation,
                });
            }
        }

        let original = named_formats(value);
        let translation = named_formats(translated);
        if !is_named_format_equals(&original, &translation) {
            issues.push(VerifyIssue::NamedFormatChanged {
                key: key.to_string(),
                original,
                translation,
            });
        }
        issues
    }

    fn notes_for(&self, key: &str, value: &str, translated: &str) -> Vec<VerifyNote> {
        // An empty translation has already been reported; nothing left to inspect.
        if translated.is_empty() && !value.is_empty() {
            return Vec::new();
        }

        let mut notes = Vec::new();
        if self.options.lost_newline {
            let count = LOST_NEWLINE_REGEX.find_iter(translated).count();
            if count > 0 {
                notes.push(VerifyNote::LostNewline {
                    key: key.to_string(),
                    count,
                });
            }
        }
        if self.options.space_before_newline {
            let count = translated.matches(SPACE_BEFORE_NEWLINE).count();
            if count > 0 {
                notes.push(VerifyNote::SpaceBeforeNewline {
                    key: key.to_string(),
                    count,
                });
            }
        }
        if self.options.english_words_mismatch {
            let translation = english_words(&clean_text(translated, &tokens(translated)));
            if !translation.is_empty() {
                let original = english_words(&clean_text(value, &tokens(value)));
                if !translation.is_subset(&original) {
                    let extra = translation.difference(&original).cloned().collect();
                    notes.push(VerifyNote::UndefinedWords {
                        key: key.to_string(),
                        original,
                        translation,
                        extra,
                    });
                }
            }
        }
        notes
    }
}

fn is_unnamed_format_exempt(key: &str) -> bool {
    UNNAMED_FORMAT_EXEMPT_PREFIXES
        .iter()
        .any(|prefix| key.starts_with(prefix))
}
