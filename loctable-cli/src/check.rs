//! `check`: verification only, without writing any table.

use loctable::{Error, ErrorPolicy, TranslationVerifier, VerifyOptions, VerifyReport};
use tracing::info;

use crate::inputs::{load_pair, log_stats};

#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub files: Vec<String>,
    pub documents: Vec<String>,
    pub verify: VerifyOptions,
}

/// Verifies the translation in `files` against its original.
pub fn run_check(options: &CheckOptions, policy: &ErrorPolicy) -> Result<VerifyReport, Error> {
    let (original, translation) = load_pair(&options.files, &options.documents, policy)?;
    log_stats(&original, &translation);
    info!("Check translation...");
    TranslationVerifier::new(options.verify.clone(), *policy).verify(&original, &translation)
}

/// Renders a report for `--json` output.
pub fn report_to_json(report: &VerifyReport) -> Result<String, Error> {
    serde_json::to_string_pretty(report).map_err(|e| Error::InvalidResource(e.to_string()))
}
