//! Loading of the `(original, translation)` pair shared by `merge`, `check` and `split`.

use loctable::{
    Error, ErrorPolicy, LocalizationTable, TranslationStats, codec::load_bilingual,
};
use tracing::info;

/// Loads one bilingual document (XLSX with split-document siblings, or XLIFF),
/// or an original and a translation flat file.
pub fn load_pair(
    files: &[String],
    documents: &[String],
    policy: &ErrorPolicy,
) -> Result<(LocalizationTable, LocalizationTable), Error> {
    match files {
        [document] => {
            info!("Process multi language {}...", document);
            load_bilingual(document, documents, policy)
        }
        [original, translation] => {
            info!("Process {} and {}...", original, translation);
            Ok((
                LocalizationTable::from_ini_file(original, policy)?,
                LocalizationTable::from_ini_file(translation, policy)?,
            ))
        }
        _ => Err(Error::config_error(format!(
            "expected one bilingual document or two flat files, got {}",
            files.len()
        ))),
    }
}

/// Logs how much of `original` is covered by `translation`.
pub fn log_stats(original: &LocalizationTable, translation: &LocalizationTable) {
    let stats = TranslationStats::new(original, translation);
    if let Some(percent) = stats.percent() {
        info!(
            "Translated keys: {}/{} ({:.2}%)",
            stats.translated, stats.total, percent
        );
        info!("           left: {}", stats.left());
    }
}
