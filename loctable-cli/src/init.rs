//! `init-config`: write a starter `convert.toml`.

use std::{fs, path::Path};

use loctable::Error;
use tracing::info;

use crate::config::{CONFIG_FILE_NAME, ConvertConfig};

#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub documents: Vec<String>,
    pub output_dir: String,
    pub english_words_mismatch: bool,
    pub space_before_newline: bool,
    pub lost_newline: bool,
}

/// Writes `<output_dir>/convert.toml` and returns its path.
pub fn run_init(options: &InitOptions) -> Result<String, Error> {
    let config = ConvertConfig::starter(
        &options.documents,
        options.english_words_mismatch,
        options.space_before_newline,
        options.lost_newline,
    );
    let path = Path::new(&options.output_dir).join(CONFIG_FILE_NAME);
    fs::write(&path, config.to_toml_string()?)?;
    info!("Written {}", path.display());
    Ok(path.display().to_string())
}
