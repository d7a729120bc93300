//! `convert.toml`: run configuration shared by all commands.
//!
//! ```toml
//! [general]
//! exclude_translate_keys = "key_a, key_b"
//!
//! [verify]
//! lost_newline = true
//! space_before_newline = false
//! english_words_mismatch = "1"
//! allowed_characters_file = "allowed_codepoints.txt"
//!
//! [split-documents]
//! ui = "UI_, Menu_"
//! hud = ["HUD_"]
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use loctable::{Error, SplitConfig, verify};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "convert.toml";

/// INI-syntax configuration of earlier tool versions. Not read; only detected.
pub const LEGACY_CONFIG_FILE_NAME: &str = "convert.ini";

/// A comma-separated string or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringList {
    Joined(String),
    List(Vec<String>),
}

impl Default for StringList {
    fn default() -> Self {
        StringList::Joined(String::new())
    }
}

impl StringList {
    /// Trimmed, non-empty items.
    pub fn items(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            StringList::Joined(joined) => joined.split(',').collect(),
            StringList::List(list) => list.iter().map(String::as_str).collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralSection {
    #[serde(default)]
    pub exclude_translate_keys: StringList,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvertConfig {
    #[serde(default)]
    pub general: GeneralSection,
    #[serde(default)]
    pub verify: toml::Table,
    #[serde(default, rename = "split-documents")]
    pub split_documents: toml::Table,
}

impl ConvertConfig {
    /// Loads `path`, or an empty configuration when the file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.is_file() {
            info!("No convert config file - {}", path.display());
            if let Some(legacy) = legacy_config_next_to(path) {
                warn!(
                    "Found {} but it is not read; move its sections to {}",
                    legacy.display(),
                    path.display()
                );
            }
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
            .map_err(|e| Error::config_error(format!("{}: {}", path.display(), e)))
    }

    pub fn parse(content: &str) -> Result<Self, Error> {
        toml::from_str(content).map_err(|e| Error::config_error(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, Error> {
        toml::to_string(self).map_err(|e| Error::config_error(e.to_string()))
    }

    /// A starter configuration: empty exclusions, the given verify flags and one
    /// empty prefix list per split document.
    pub fn starter(
        documents: &[String],
        english_words_mismatch: bool,
        space_before_newline: bool,
        lost_newline: bool,
    ) -> Self {
        let mut verify = toml::Table::new();
        verify.insert(
            verify::ENGLISH_WORDS_MISMATCH_SETTING.to_string(),
            toml::Value::Boolean(english_words_mismatch),
        );
        verify.insert(
            verify::SPACE_BEFORE_NEWLINE_SETTING.to_string(),
            toml::Value::Boolean(space_before_newline),
        );
        verify.insert(
            verify::LOST_NEWLINE_SETTING.to_string(),
            toml::Value::Boolean(lost_newline),
        );
        let split_documents = documents
            .iter()
            .map(|document| (document.clone(), toml::Value::String(String::new())))
            .collect();
        Self {
            general: GeneralSection::default(),
            verify,
            split_documents,
        }
    }

    pub fn exclude_translate_keys(&self) -> Vec<String> {
        self.general.exclude_translate_keys.items()
    }

    /// `[verify]` entries as string settings. Booleans and integers are rendered
    /// as text; other value types are skipped.
    pub fn verify_settings(&self) -> Vec<(String, String)> {
        self.verify
            .iter()
            .filter_map(|(name, value)| {
                let text = match value {
                    toml::Value::String(text) => text.clone(),
                    toml::Value::Boolean(flag) => flag.to_string(),
                    toml::Value::Integer(number) => number.to_string(),
                    other => {
                        warn!("ignoring verify setting {} = {}", name, other);
                        return None;
                    }
                };
                Some((name.clone(), text))
            })
            .collect()
    }

    /// The `[split-documents]` section, in declaration order.
    pub fn split_config(&self) -> Result<SplitConfig, Error> {
        let mut config = SplitConfig::new();
        for (document, prefixes) in &self.split_documents {
            let prefixes: StringList = prefixes.clone().try_into().map_err(|_| {
                Error::config_error(format!(
                    "split document `{document}` must be a string or an array of strings"
                ))
            })?;
            config.add_document(document, prefixes.items())?;
        }
        Ok(config)
    }
}

/// `convert.ini` in the directory of `path`, when it exists.
pub fn legacy_config_next_to(path: &Path) -> Option<PathBuf> {
    let legacy = path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(LEGACY_CONFIG_FILE_NAME);
    legacy.is_file().then_some(legacy)
}
