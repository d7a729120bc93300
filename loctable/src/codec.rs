//! Extension-based dispatch for bilingual (source + translation) documents.
//!
//! A bilingual document is either a two-column XLSX sheet set or an XLIFF file.
//! Both decode into the same `(source, target)` pair of tables.

use std::path::Path;

use crate::{
    error::Error,
    formats::{FormatType, infer_format_from_extension, xlsx},
    policy::ErrorPolicy,
    types::LocalizationTable,
};

/// Formats that carry a source and a target column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BilingualFormat {
    Xlsx,
    Xliff,
}

impl BilingualFormat {
    /// Picks the loader for `path` from its extension.
    ///
    /// Anything other than `.xlsx` or `.xliff`/`.xlf` is [`Error::UnknownFormat`].
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        match infer_format_from_extension(path) {
            Some(FormatType::Xlsx) => Ok(BilingualFormat::Xlsx),
            Some(FormatType::Xliff) => Ok(BilingualFormat::Xliff),
            _ => Err(Error::UnknownFormat(path.display().to_string())),
        }
    }
}

impl From<BilingualFormat> for FormatType {
    fn from(format: BilingualFormat) -> Self {
        match format {
            BilingualFormat::Xlsx => FormatType::Xlsx,
            BilingualFormat::Xliff => FormatType::Xliff,
        }
    }
}

/// Loads `(source, target)` tables from a bilingual document.
///
/// Sheets are read as a two-column multi-document set: the base sheet
/// `global.ini` in `path`, plus one sibling `<document>.xlsx` per entry of
/// `extra_documents`. XLIFF ignores `extra_documents`.
///
/// # Example
///
/// ```rust,no_run
/// use loctable::{ErrorPolicy, codec::load_bilingual};
/// let (source, target) = load_bilingual("global.ini.xliff", &[], &ErrorPolicy::strict())?;
/// println!("{}/{}", target.len(), source.len());
/// Ok::<(), loctable::Error>(())
/// ```
pub fn load_bilingual<P: AsRef<Path>>(
    path: P,
    extra_documents: &[String],
    policy: &ErrorPolicy,
) -> Result<(LocalizationTable, LocalizationTable), Error> {
    let path = path.as_ref();
    match BilingualFormat::from_path(path)? {
        BilingualFormat::Xlsx => {
            let mut tables = xlsx::read_documents(
                path,
                xlsx::MAIN_SHEET_NAME,
                2,
                extra_documents,
                policy,
            )?
            .into_iter();
            let source = tables.next().unwrap_or_default();
            let target = tables.next().unwrap_or_default();
            Ok((source, target))
        }
        BilingualFormat::Xliff => LocalizationTable::from_xliff_file(path, policy),
    }
}
