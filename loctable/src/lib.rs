#![forbid(unsafe_code)]
//! Localization string tables for flat `key=value` files, XLSX sheets and XLIFF.
//!
//! Every format decodes into one ordered [`LocalizationTable`]. On top of that the
//! crate provides placeholder extraction, translation verification, the
//! three-way merge used to rebuild a shippable file, and prefix-based routing of
//! keys into split documents.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use loctable::{
//!     AssembleOptions, ErrorPolicy, LocalizationTable, TranslationVerifier, VerifyOptions,
//!     codec::load_bilingual, merge::assemble,
//! };
//!
//! let policy = ErrorPolicy::strict();
//! let reference = LocalizationTable::from_ini_file("global_ref.ini", &policy)?;
//! let (original, translation) = load_bilingual("global.ini.xlsx", &[], &policy)?;
//!
//! TranslationVerifier::new(VerifyOptions::new(), policy).verify(&original, &translation)?;
//! let (output, _) = assemble(Some(&reference), &original, &translation, &AssembleOptions::new());
//! output.save_ini_file("global.ini")?;
//! # Ok::<(), loctable::Error>(())
//! ```
//!
//! # Supported Formats
//!
//! - **Flat file**: `key=value` per line, UTF-8 with BOM, CRLF
//! - **XLSX**: one `key=value` column per language, optional split-document siblings
//! - **XLIFF**: `trans-unit` source/target pairs

pub mod codec;
pub mod error;
pub mod formats;
pub mod merge;
pub mod placeholder;
pub mod policy;
pub mod split;
pub mod traits;
pub mod transform;
pub mod types;
pub mod verify;

// Re-export most used types for easy consumption
pub use crate::{
    codec::{BilingualFormat, load_bilingual},
    error::Error,
    formats::{FormatType, MultiColumnSheet, infer_format_from_extension},
    merge::{AssembleOptions, MergeDecision, MergeReport, ThreeWayMerger, assemble, build_import},
    placeholder::{FormatToken, NamedFormat},
    policy::ErrorPolicy,
    split::{SplitConfig, SplitTables},
    transform::CharacterMap,
    types::{Entry, LocalizationTable, TranslationStats},
    verify::{TranslationVerifier, VerifyIssue, VerifyNote, VerifyOptions, VerifyReport},
};
