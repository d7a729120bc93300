//! `merge`: rebuild a shippable flat file from a translation and the reference.

use loctable::{
    AssembleOptions, Error, ErrorPolicy, LocalizationTable, TranslationVerifier, VerifyOptions,
    merge::{assemble, build_import, read_prefix_file},
};
use tracing::{info, warn};

use crate::inputs::{load_pair, log_stats};

#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// One bilingual document, or original + translation flat files.
    pub files: Vec<String>,
    pub output: String,
    /// `None` assembles from the original alone.
    pub reference: Option<String>,
    pub documents: Vec<String>,
    /// Verification to run before merging; `None` skips it.
    pub verify: Option<VerifyOptions>,
    pub version: Option<String>,
    pub allow_outdated: bool,
    pub excluded_keys: Vec<String>,
    pub excluded_prefixes_file: Option<String>,
    pub build_import: bool,
}

/// Loads, optionally verifies, merges and writes the output file.
pub fn run_merge(options: &MergeOptions, policy: &ErrorPolicy) -> Result<(), Error> {
    info!(
        "Convert multi language to ini (with ref {}): {} -> {}",
        options.reference.as_deref().unwrap_or("none"),
        options.files.join(", "),
        options.output
    );
    let reference = options
        .reference
        .as_ref()
        .map(|path| {
            info!("Process reference ini {}...", path);
            LocalizationTable::from_ini_file(path, policy)
        })
        .transpose()?;
    let (original, translation) = load_pair(&options.files, &options.documents, policy)?;
    log_stats(&original, &translation);

    if let Some(verify) = &options.verify {
        info!("Check translation...");
        let report = TranslationVerifier::new(verify.clone(), *policy).verify(&original, &translation)?;
        if !report.is_clean() {
            warn!("{} verification issue(s) found", report.issues.len());
        }
    }

    info!("Write output {}...", options.output);
    let output = match (&reference, options.build_import) {
        (Some(reference), true) => {
            warn!("Build import ini mode");
            build_import(reference, &original, &translation)
        }
        (None, true) => {
            return Err(Error::config_error(
                "build-import mode needs a reference file",
            ));
        }
        (reference, false) => {
            let assemble_options = assemble_options(options)?;
            let (output, report) =
                assemble(reference.as_ref(), &original, &translation, &assemble_options);
            info!(
                "Merged keys: {} unchanged, {} outdated, {} reference, {} excluded, {} untranslated",
                report.unchanged,
                report.outdated,
                report.reference_used,
                report.excluded,
                report.untranslated
            );
            output
        }
    };
    output.save_ini_file(&options.output)?;
    Ok(())
}

fn assemble_options(options: &MergeOptions) -> Result<AssembleOptions, Error> {
    let excluded_prefixes = match &options.excluded_prefixes_file {
        Some(path) => read_prefix_file(path)?,
        None => Vec::new(),
    };
    Ok(AssembleOptions::new()
        .with_allow_outdated(options.allow_outdated)
        .with_excluded_keys(options.excluded_keys.iter().cloned())
        .with_excluded_prefixes(excluded_prefixes)
        .with_version(options.version.clone()))
}
