//! `split`: a bilingual document to a base flat file and a translation flat file.

use loctable::{Error, ErrorPolicy, codec::load_bilingual};
use tracing::info;

#[derive(Debug, Clone)]
pub struct SplitOptions {
    pub input: String,
    pub base: String,
    pub translation: String,
    /// Split-document siblings to merge in (XLSX only).
    pub documents: Vec<String>,
}

pub fn run_split(options: &SplitOptions, policy: &ErrorPolicy) -> Result<(), Error> {
    info!(
        "Split multi language: {} -> {}, {}",
        options.input, options.base, options.translation
    );
    let (source, target) = load_bilingual(&options.input, &options.documents, policy)?;
    info!("Write output base {}...", options.base);
    source.save_ini_file(&options.base)?;
    info!("Write output translate {}...", options.translation);
    target.save_ini_file(&options.translation)?;
    Ok(())
}
