use std::path::Path;

use loctable::{FormatType, infer_format_from_extension};
use unic_langid::LanguageIdentifier;

/// Validate file path exists and is a regular file
pub fn validate_file_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return Err(format!("File does not exist: {}", path));
    }

    if !path_obj.is_file() {
        return Err(format!("Path is not a file: {}", path));
    }

    Ok(())
}

/// Validate the output directory exists or can be created
pub fn validate_output_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if let Some(parent) = path_obj.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                return Err(format!("Cannot create output directory: {}", e));
            }
        }
    }

    Ok(())
}

/// Validate the sheet header language with unic-langid
pub fn validate_language_code(lang: &str) -> Result<(), String> {
    if lang.is_empty() {
        return Err("Language code cannot be empty".to_string());
    }

    match lang.parse::<LanguageIdentifier>() {
        Ok(_) => Ok(()),
        Err(_) => Err(format!(
            "Invalid language code format: {}. Expected valid BCP 47 language identifier",
            lang
        )),
    }
}

/// Validate that `path` has the extension of `expected`
pub fn validate_format(path: &str, expected: &[FormatType]) -> Result<FormatType, String> {
    match infer_format_from_extension(path) {
        Some(format) if expected.contains(&format) => Ok(format),
        _ => Err(format!(
            "Unsupported file format: {}. Expected one of: {}",
            path,
            expected
                .iter()
                .map(FormatType::extension)
                .collect::<Vec<_>>()
                .join(", ")
        )),
    }
}

/// Validate a list of inputs: one bilingual document, or an original and a translation flat file.
/// Flat files are recognized by position, not extension (`global.ini.original`, `global.ini.out`).
pub fn validate_input_set(files: &[String]) -> Result<(), String> {
    for file in files {
        validate_file_path(file)?;
    }
    match files {
        [single] => validate_format(single, &[FormatType::Xlsx, FormatType::Xliff]).map(|_| ()),
        [_original, _translation] => Ok(()),
        [] => Err("At least one input file is required".to_string()),
        _ => Err(format!("Too many input files specified - {}", files.join(", "))),
    }
}
