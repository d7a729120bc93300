//! `to-sheet` and `to-bilingual-sheet`: flat files to XLSX documents.

use std::path::{Path, PathBuf};

use loctable::{
    Error, ErrorPolicy, LocalizationTable, MultiColumnSheet, SplitConfig,
    formats::xlsx::{EXTENSION, MAIN_SHEET_NAME},
};
use tracing::info;

/// Options for `to-sheet`.
#[derive(Debug, Clone)]
pub struct SheetOptions {
    pub input: String,
    pub output: String,
    pub language: String,
    pub split: Option<SplitConfig>,
}

/// Options for `to-bilingual-sheet`.
#[derive(Debug, Clone)]
pub struct BilingualSheetOptions {
    pub input: String,
    pub reference: String,
    pub output: String,
    pub language: String,
    pub all_keys: bool,
    pub split: Option<SplitConfig>,
}

/// `<output dir>/<document>.xlsx`
fn document_path(output: &str, document: &str) -> PathBuf {
    Path::new(output)
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(format!("{document}.{EXTENSION}"))
}

/// Writes a flat file as a single-column sheet, split into sibling documents when
/// a split configuration is given.
pub fn run_to_sheet(options: &SheetOptions, policy: &ErrorPolicy) -> Result<(), Error> {
    info!("Convert ini to xlsx: {} -> {}", options.input, options.output);
    let input = LocalizationTable::from_ini_file(&options.input, policy)?;

    let Some(split) = options.split.as_ref().filter(|split| !split.is_empty()) else {
        input.save_sheet(&options.output, MAIN_SHEET_NAME, &options.language)?;
        info!("Written lines: {}", input.len());
        return Ok(());
    };

    info!("Split ini...");
    let tables = split.split(&input);
    info!("Write output main {}...", options.output);
    tables
        .main
        .save_sheet(&options.output, MAIN_SHEET_NAME, &options.language)?;
    info!("Written lines: {}", tables.main.len());
    for (document, table) in &tables.documents {
        let path = document_path(&options.output, document);
        info!("Write output split {}...", path.display());
        table.save_sheet(&path, document, &options.language)?;
        info!("Written lines: {}", table.len());
    }
    Ok(())
}

/// Writes a translation and its reference as a two-column sheet, in reference
/// order. When splitting, empty source values are marked as translated.
pub fn run_to_bilingual_sheet(
    options: &BilingualSheetOptions,
    policy: &ErrorPolicy,
) -> Result<(), Error> {
    info!(
        "Convert ini to xlsx (with ref {}): {} -> {}",
        options.reference, options.input, options.output
    );
    let translation = LocalizationTable::from_ini_file(&options.input, policy)?;
    let reference = LocalizationTable::from_ini_file(&options.reference, policy)?;

    let Some(split) = options.split.as_ref().filter(|split| !split.is_empty()) else {
        let sheet = MultiColumnSheet::from_tables(
            &options.language,
            &reference,
            &translation,
            options.all_keys,
            false,
        );
        sheet.write_to(&options.output, MAIN_SHEET_NAME)?;
        info!("Written lines: {}", sheet.len());
        return Ok(());
    };

    info!("Split ini...");
    let parts = split.split(&reference);
    let main = MultiColumnSheet::from_tables(
        &options.language,
        &parts.main,
        &translation,
        options.all_keys,
        true,
    );
    info!("Write output main {}...", options.output);
    main.write_to(&options.output, MAIN_SHEET_NAME)?;
    info!("Written lines: {}", main.len());
    for (document, part) in &parts.documents {
        let sheet = MultiColumnSheet::from_tables(
            &options.language,
            part,
            &translation,
            options.all_keys,
            true,
        );
        let path = document_path(&options.output, document);
        info!("Write output split {}...", path.display());
        sheet.write_to(&path, document)?;
        info!("Written lines: {}", sheet.len());
    }
    Ok(())
}
