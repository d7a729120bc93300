//! Support for XLSX localization sheets.
//!
//! Sheets hold pre-rendered `key=value` strings, one entry per row, one language per
//! column. Row 1 is a language-code header and is never parsed as an entry.
//!
//! - Single-column sheets carry one table (`[lang]`, then `key=value` rows).
//! - Multi-column sheets carry a source column and one or more translation columns;
//!   column 0 owns the key, the others must repeat it or stay empty.
//! - A multi-document set is a base sheet plus one sibling `<document>.xlsx` per split
//!   document, each with the same column layout.

use std::path::Path;

use calamine::{Data, Range, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::Workbook;
use tracing::info;

use crate::{
    error::Error,
    formats::ini::{ParsedLine, key_value_text, parse_line},
    policy::ErrorPolicy,
    types::LocalizationTable,
};

/// Sheet name of the main document.
pub const MAIN_SHEET_NAME: &str = "global.ini";

/// Language of the source column.
pub const SOURCE_LANGUAGE: &str = "en";

/// File extension of sheet documents.
pub const EXTENSION: &str = "xlsx";

/// Opens `path` and returns the used range of `sheet_name`.
pub fn read_sheet<P: AsRef<Path>>(path: P, sheet_name: &str) -> Result<Range<Data>, Error> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    Ok(workbook.worksheet_range(sheet_name)?)
}

/// Loads one column of a sheet into a table.
pub fn read_column<P: AsRef<Path>>(
    path: P,
    sheet_name: &str,
    column: usize,
    policy: &ErrorPolicy,
) -> Result<LocalizationTable, Error> {
    let range = read_sheet(path, sheet_name)?;
    column_from_range(&range, column, policy)
}

/// Loads `column_count` columns of a sheet in lockstep, one table per column.
pub fn read_columns<P: AsRef<Path>>(
    path: P,
    sheet_name: &str,
    column_count: usize,
    policy: &ErrorPolicy,
) -> Result<Vec<LocalizationTable>, Error> {
    let range = read_sheet(path, sheet_name)?;
    columns_from_range(&range, column_count, policy)
}

/// Loads the base sheet and merges in one sibling sheet per extra document.
///
/// Each extra document is read from `<dir of base>/<document>.xlsx`, sheet `<document>`,
/// and overwrites the base tables column by column.
pub fn read_documents<P: AsRef<Path>>(
    base_path: P,
    sheet_name: &str,
    column_count: usize,
    documents: &[String],
    policy: &ErrorPolicy,
) -> Result<Vec<LocalizationTable>, Error> {
    if column_count == 0 {
        return Ok(Vec::new());
    }
    let base_path = base_path.as_ref();
    info!("Loading {}", base_path.display());
    let mut tables = read_columns(base_path, sheet_name, column_count, policy)?;

    let directory = base_path.parent().unwrap_or_else(|| Path::new(""));
    for document in documents {
        let document_path = directory.join(format!("{document}.{EXTENSION}"));
        info!("Loading {}", document_path.display());
        let extra = read_columns(&document_path, document, column_count, policy)?;
        for (table, additional) in tables.iter_mut().zip(extra.iter()) {
            table.merge_from(additional);
        }
    }
    Ok(tables)
}

/// Rows below the header, paired with their 1-based sheet row number.
fn data_rows(range: &Range<Data>) -> impl Iterator<Item = (usize, &[Data])> {
    let first_row = range.start().map_or(0, |(row, _)| row as usize);
    range
        .rows()
        .enumerate()
        .skip(1)
        .map(move |(index, row)| (first_row + index + 1, row))
}

/// Number of columns from column A up to the last used one.
fn column_span(range: &Range<Data>) -> usize {
    match range.start() {
        Some((_, first_column)) => first_column as usize + range.width(),
        None => 0,
    }
}

/// Text of an absolute column in `row`; empty and NaN cells read as `None`.
fn cell_text(range: &Range<Data>, row: &[Data], column: usize) -> Option<String> {
    let first_column = range.start().map_or(0, |(_, col)| col as usize);
    let cell = row.get(column.checked_sub(first_column)?)?;
    match cell {
        Data::Empty => None,
        Data::String(text) => Some(text.clone()),
        Data::Float(number) if number.is_nan() => None,
        other => Some(other.to_string()),
    }
}

pub(crate) fn column_from_range(
    range: &Range<Data>,
    column: usize,
    policy: &ErrorPolicy,
) -> Result<LocalizationTable, Error> {
    let span = column_span(range);
    let mut table = LocalizationTable::new();
    for (line, row) in data_rows(range) {
        if column >= span {
            policy.report(Error::MissingColumn { line, column })?;
            continue;
        }
        let Some(text) = cell_text(range, row, column) else {
            continue;
        };
        match parse_line(&text) {
            ParsedLine::Blank => {}
            ParsedLine::Pair(key, value) => table.set(key, value),
            ParsedLine::MissingSeparator(content) => policy.report(Error::MissingSeparator {
                line,
                content: content.to_string(),
            })?,
        }
    }
    Ok(table)
}

pub(crate) fn columns_from_range(
    range: &Range<Data>,
    column_count: usize,
    policy: &ErrorPolicy,
) -> Result<Vec<LocalizationTable>, Error> {
    let mut tables = vec![LocalizationTable::new(); column_count];
    if column_count == 0 {
        return Ok(tables);
    }
    let span = column_span(range);
    for (line, row) in data_rows(range) {
        if span == 0 {
            policy.report(Error::MissingColumn { line, column: 0 })?;
            continue;
        }
        let Some(text) = cell_text(range, row, 0) else {
            continue;
        };
        let (key, value) = match parse_line(&text) {
            ParsedLine::Blank => continue,
            ParsedLine::Pair(key, value) => (key, value),
            ParsedLine::MissingSeparator(content) => {
                policy.report(Error::MissingSeparator {
                    line,
                    content: content.to_string(),
                })?;
                continue;
            }
        };
        tables[0].set(key, value);

        for (column, table) in tables
            .iter_mut()
            .enumerate()
            .take(column_count.min(span))
            .skip(1)
        {
            let Some(translated) = cell_text(range, row, column) else {
                continue;
            };
            match parse_line(&translated) {
                ParsedLine::Blank => {}
                ParsedLine::Pair(translated_key, _) if translated_key != key => {
                    policy.report(Error::KeyDrift {
                        line,
                        expected: key.to_string(),
                        found: translated_key.to_string(),
                    })?
                }
                ParsedLine::Pair(translated_key, translated_value) => {
                    table.set(translated_key, translated_value)
                }
                ParsedLine::MissingSeparator(_) => policy.report(Error::MissingSeparator {
                    line,
                    content: key.to_string(),
                })?,
            }
        }
    }
    Ok(tables)
}

/// Writes rows of cells to a fresh workbook with a single sheet. Empty cells are left blank.
fn write_rows<P, I, R>(path: P, sheet_name: &str, rows: I) -> Result<(), Error>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<str>,
{
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;
    for (row_index, row) in rows.into_iter().enumerate() {
        for (column_index, cell) in row.into_iter().enumerate() {
            let cell = cell.as_ref();
            if cell.is_empty() {
                continue;
            }
            worksheet.write_string(row_index as u32, column_index as u16, cell)?;
        }
    }
    workbook.save(path)?;
    Ok(())
}

/// Writes a single-column sheet: `language` in row 1, then one `key=value` row per entry.
pub fn write_column<P: AsRef<Path>>(
    table: &LocalizationTable,
    path: P,
    sheet_name: &str,
    language: &str,
) -> Result<(), Error> {
    let header = std::iter::once([language.to_string()]);
    let rows = table.entries().iter().map(|entry| [entry.to_string()]);
    write_rows(path, sheet_name, header.chain(rows))
}

impl LocalizationTable {
    /// Loads one column of an XLSX sheet.
    pub fn from_sheet_column<P: AsRef<Path>>(
        path: P,
        sheet_name: &str,
        column: usize,
        policy: &ErrorPolicy,
    ) -> Result<Self, Error> {
        read_column(path, sheet_name, column, policy)
    }

    /// Loads `column_count` columns of an XLSX sheet, one table per column.
    pub fn from_sheet_columns<P: AsRef<Path>>(
        path: P,
        sheet_name: &str,
        column_count: usize,
        policy: &ErrorPolicy,
    ) -> Result<Vec<Self>, Error> {
        read_columns(path, sheet_name, column_count, policy)
    }

    /// Loads a base sheet plus its split-document siblings.
    pub fn from_multi_document_sheets<P: AsRef<Path>>(
        base_path: P,
        sheet_name: &str,
        column_count: usize,
        documents: &[String],
        policy: &ErrorPolicy,
    ) -> Result<Vec<Self>, Error> {
        read_documents(base_path, sheet_name, column_count, documents, policy)
    }

    /// Saves the table as a single-column sheet headed by `language`.
    pub fn save_sheet<P: AsRef<Path>>(
        &self,
        path: P,
        sheet_name: &str,
        language: &str,
    ) -> Result<(), Error> {
        write_column(self, path, sheet_name, language)
    }
}

/// Builder for a two-column (original/translation) sheet.
///
/// Row 1 is `[source language, target language]`; every appended entry adds
/// `["key=value", "key=translation" | ""]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiColumnSheet {
    rows: Vec<[String; 2]>,
    auto_mark_empty_as_translated: bool,
}

impl MultiColumnSheet {
    /// Creates a sheet with only the language header row.
    pub fn new(target_language: &str) -> Self {
        Self::with_languages(SOURCE_LANGUAGE, target_language)
    }

    pub fn with_languages(source_language: &str, target_language: &str) -> Self {
        Self {
            rows: vec![[source_language.to_string(), target_language.to_string()]],
            auto_mark_empty_as_translated: false,
        }
    }

    /// When enabled, an untranslated entry with an empty source value gets an explicit
    /// `key=` translation instead of an empty cell.
    pub fn set_auto_mark_empty_as_translated(&mut self, enabled: bool) {
        self.auto_mark_empty_as_translated = enabled;
    }

    pub fn with_auto_mark_empty_as_translated(mut self, enabled: bool) -> Self {
        self.set_auto_mark_empty_as_translated(enabled);
        self
    }

    /// Builds a sheet from a reference table and a translation of it, in
    /// reference order.
    ///
    /// With `all_keys`, every reference key gets a row; otherwise only keys with a
    /// non-empty translation do.
    pub fn from_tables(
        target_language: &str,
        reference: &LocalizationTable,
        translation: &LocalizationTable,
        all_keys: bool,
        auto_mark_empty_as_translated: bool,
    ) -> Self {
        let mut sheet = Self::new(target_language)
            .with_auto_mark_empty_as_translated(auto_mark_empty_as_translated);
        for (key, value) in reference.iter() {
            let translated = translation.get(key);
            if all_keys || translated.is_some_and(|t| !t.is_empty()) {
                sheet.append(key, value, translated);
            }
        }
        sheet
    }

    /// Appends one entry. An empty `translation` counts as untranslated.
    pub fn append(&mut self, key: &str, value: &str, translation: Option<&str>) {
        let original = key_value_text(key, value);
        let translated = match translation {
            Some(translation) if !translation.is_empty() => key_value_text(key, translation),
            _ if self.auto_mark_empty_as_translated && value.is_empty() => {
                key_value_text(key, "")
            }
            _ => String::new(),
        };
        self.rows.push([original, translated]);
    }

    /// Number of entry rows, header excluded.
    pub fn len(&self) -> usize {
        self.rows.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All rows including the header.
    pub fn rows(&self) -> &[[String; 2]] {
        &self.rows
    }

    pub fn write_to<P: AsRef<Path>>(&self, path: P, sheet_name: &str) -> Result<(), Error> {
        write_rows(path, sheet_name, self.rows.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rows: &[&[&str]]) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(1) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if !cell.is_empty() {
                    range.set_value((r as u32, c as u32), Data::String(cell.to_string()));
                }
            }
        }
        range
    }

    #[test]
    fn test_single_column_skips_header_and_empty_cells() {
        let range = sheet(&[&["en"], &["a=1"], &[""], &["b=x=y"]]);
        let table = column_from_range(&range, 0, &ErrorPolicy::strict()).unwrap();
        assert_eq!(table.iter().collect::<Vec<_>>(), vec![("a", "1"), ("b", "x=y")]);
    }

    #[test]
    fn test_nan_cell_is_empty() {
        let mut range = sheet(&[&["en"], &["a=1"], &["b=2"]]);
        range.set_value((1, 0), Data::Float(f64::NAN));
        let table = column_from_range(&range, 0, &ErrorPolicy::strict()).unwrap();
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_single_column_missing_separator_reports_sheet_row() {
        let range = sheet(&[&["en"], &["a=1"], &["oops"]]);
        let result = column_from_range(&range, 0, &ErrorPolicy::strict());
        assert!(matches!(result, Err(Error::MissingSeparator { line: 3, .. })));
    }

    #[test]
    fn test_column_out_of_range() {
        let range = sheet(&[&["en"], &["a=1"]]);
        let result = column_from_range(&range, 2, &ErrorPolicy::strict());
        assert!(matches!(
            result,
            Err(Error::MissingColumn { line: 2, column: 2 })
        ));
        let lenient = column_from_range(&range, 2, &ErrorPolicy::new()).unwrap();
        assert!(lenient.is_empty());
    }

    #[test]
    fn test_two_columns_in_lockstep() {
        let range = sheet(&[
            &["en", "uk"],
            &["a=Hello", "a=Привіт"],
            &["b=World", ""],
            &["c=", "c="],
        ]);
        let tables = columns_from_range(&range, 2, &ErrorPolicy::strict()).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].len(), 3);
        assert_eq!(tables[1].iter().collect::<Vec<_>>(), vec![("a", "Привіт"), ("c", "")]);
    }

    #[test]
    fn test_key_drift_between_columns() {
        let range = sheet(&[&["en", "uk"], &["key1=valA", "key2=valB"]]);
        let result = columns_from_range(&range, 2, &ErrorPolicy::strict());
        match result {
            Err(Error::KeyDrift {
                line,
                expected,
                found,
            }) => {
                assert_eq!(line, 2);
                assert_eq!(expected, "key1");
                assert_eq!(found, "key2");
            }
            other => panic!("expected KeyDrift, got {:?}", other),
        }

        let tables = columns_from_range(&range, 2, &ErrorPolicy::new()).unwrap();
        assert_eq!(tables[0].get("key1"), Some("valA"));
        assert!(tables[1].is_empty());
    }

    #[test]
    fn test_translation_cell_without_separator() {
        let range = sheet(&[&["en", "uk"], &["a=1", "garbage"]]);
        let result = columns_from_range(&range, 2, &ErrorPolicy::strict());
        assert!(matches!(result, Err(Error::MissingSeparator { line: 2, .. })));
    }

    #[test]
    fn test_zero_columns() {
        let range = sheet(&[&["en"], &["a=1"]]);
        assert!(columns_from_range(&range, 0, &ErrorPolicy::strict())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_multi_column_sheet_append() {
        let mut sheet = MultiColumnSheet::new("uk");
        sheet.append("a", "Hello", Some("Привіт"));
        sheet.append("b", "World", None);
        sheet.append("c", "", None);
        sheet.append("d", "Text", Some(""));
        assert_eq!(sheet.len(), 4);
        assert_eq!(sheet.rows()[0], ["en".to_string(), "uk".to_string()]);
        assert_eq!(sheet.rows()[1], ["a=Hello".to_string(), "a=Привіт".to_string()]);
        assert_eq!(sheet.rows()[2][1], "");
        assert_eq!(sheet.rows()[3][1], "");
        assert_eq!(sheet.rows()[4][1], "");
    }

    #[test]
    fn test_multi_column_sheet_from_tables() {
        let reference: LocalizationTable = [("a", "A"), ("b", "B"), ("c", "")].into_iter().collect();
        let translation: LocalizationTable = [("a", "А"), ("b", "")].into_iter().collect();

        let all = MultiColumnSheet::from_tables("uk", &reference, &translation, true, true);
        assert_eq!(all.len(), 3);
        assert_eq!(all.rows()[3], ["c=".to_string(), "c=".to_string()]);

        let translated_only =
            MultiColumnSheet::from_tables("uk", &reference, &translation, false, false);
        assert_eq!(translated_only.len(), 1);
        assert_eq!(translated_only.rows()[1], ["a=A".to_string(), "a=А".to_string()]);
    }

    #[test]
    fn test_multi_column_sheet_auto_mark_empty() {
        let mut sheet = MultiColumnSheet::new("uk").with_auto_mark_empty_as_translated(true);
        sheet.append("empty", "", None);
        sheet.append("text", "Text", None);
        assert_eq!(sheet.rows()[1], ["empty=".to_string(), "empty=".to_string()]);
        assert_eq!(sheet.rows()[2][1], "");
    }
}
