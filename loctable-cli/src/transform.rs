//! `transform`: replace characters the game font cannot render.

use loctable::{CharacterMap, Error, ErrorPolicy, LocalizationTable};
use tracing::info;

#[derive(Debug, Clone)]
pub struct TransformOptions {
    pub input: String,
    /// Defaults to `<input>.out`.
    pub output: Option<String>,
    pub dry_run: bool,
}

impl TransformOptions {
    pub fn output_path(&self) -> String {
        self.output
            .clone()
            .unwrap_or_else(|| format!("{}.out", self.input))
    }
}

/// Applies the default character map. Returns the number of changed values.
pub fn run_transform(options: &TransformOptions, policy: &ErrorPolicy) -> Result<usize, Error> {
    info!("Load {}...", options.input);
    let input = LocalizationTable::from_ini_file(&options.input, policy)?;
    info!("Transform {}...", options.input);
    let (output, changed) = CharacterMap::default().transform_table(&input);
    if !options.dry_run {
        let path = options.output_path();
        info!("Save {}...", path);
        output.save_ini_file(&path)?;
    }
    Ok(changed)
}
