//! All supported localization file formats for loctable.
//!
//! This module re-exports the main types for each format and provides
//! the [`FormatType`] enum for generic format handling across the crate.

pub mod ini;
pub mod xliff;
pub mod xlsx;

use std::{
    fmt::{Display, Formatter},
    path::Path,
    str::FromStr,
};

pub use xliff::Document as XliffDocument;
pub use xlsx::MultiColumnSheet;

use crate::Error;

/// Represents all supported localization file formats for generic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatType {
    /// Flat `key=value` file (`global.ini`).
    Ini,
    /// XLSX sheet, one `key=value` column per language.
    Xlsx,
    /// XLIFF translation-interchange document.
    Xliff,
}

/// Implements [`std::fmt::Display`] for [`FormatType`].
///
/// # Example
/// ```rust
/// use loctable::formats::FormatType;
/// assert_eq!(FormatType::Ini.to_string(), "ini");
/// assert_eq!(FormatType::Xliff.to_string(), "xliff");
/// ```
impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Implements [`std::str::FromStr`] for [`FormatType`].
///
/// Accepts (case-insensitive) `"ini"`, `"xlsx"`, `"xliff"` and `"xlf"`.
/// Returns [`crate::error::Error::UnknownFormat`] for anything else.
///
/// # Example
/// ```rust
/// use loctable::formats::FormatType;
/// use std::str::FromStr;
/// assert_eq!(FormatType::from_str("XLSX").unwrap(), FormatType::Xlsx);
/// assert!(FormatType::from_str("csv").is_err());
/// ```
impl FromStr for FormatType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "ini" => Ok(FormatType::Ini),
            "xlsx" => Ok(FormatType::Xlsx),
            "xliff" | "xlf" => Ok(FormatType::Xliff),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

impl FormatType {
    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Ini => "ini",
            FormatType::Xlsx => xlsx::EXTENSION,
            FormatType::Xliff => "xliff",
        }
    }

    /// Whether the format carries both a source and a target table.
    pub fn is_bilingual(&self) -> bool {
        matches!(self, FormatType::Xlsx | FormatType::Xliff)
    }
}

/// Infers a [`FormatType`] from a file path's extension.
///
/// # Example
/// ```rust
/// use loctable::formats::{FormatType, infer_format_from_extension};
///
/// assert_eq!(infer_format_from_extension("global.ini"), Some(FormatType::Ini));
/// assert_eq!(infer_format_from_extension("global.ini.xlsx"), Some(FormatType::Xlsx));
/// assert_eq!(infer_format_from_extension("global.ini.xliff"), Some(FormatType::Xliff));
/// assert_eq!(infer_format_from_extension("global.ini.csv"), None);
/// ```
pub fn infer_format_from_extension<P: AsRef<Path>>(path: P) -> Option<FormatType> {
    let extension = path.as_ref().extension()?.to_str()?;
    FormatType::from_str(extension).ok()
}
