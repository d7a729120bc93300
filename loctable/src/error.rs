//! All error types for the loctable crate.
//!
//! These are returned from all fallible operations (parsing, verification, serialization).
//! Structural parse and verification failures are routed through
//! [`crate::policy::ErrorPolicy::report`], which decides whether they abort the run.

use thiserror::Error;

use crate::verify::VerifyIssue;

#[derive(Error, Debug)]
pub enum Error {
    #[error("missing key value separator '=': {content} at line: {line}")]
    MissingSeparator { line: usize, content: String },

    #[error("translation key change found: {expected} -> {found} at line: {line}")]
    KeyDrift {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("invalid column index {column} for row at line: {line}")]
    MissingColumn { line: usize, column: usize },

    #[error("unknown input file format `{0}`")]
    UnknownFormat(String),

    #[error(transparent)]
    Verify(#[from] VerifyIssue),

    #[error("malformed codepoint list: {0}")]
    MalformedCodepoint(String),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("XLSX read error: {0}")]
    SheetRead(#[from] calamine::XlsxError),

    #[error("XLSX write error: {0}")]
    SheetWrite(#[from] rust_xlsxwriter::XlsxError),
}

impl Error {
    /// Line number attached to the error, when the error refers to a source line or sheet row.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::MissingSeparator { line, .. }
            | Error::KeyDrift { line, .. }
            | Error::MissingColumn { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Creates a new configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }
}
