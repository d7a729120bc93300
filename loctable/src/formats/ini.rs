//! Support for the flat `key=value` localization file (`global.ini`).
//!
//! One entry per line, split on the first `=`. Reading accepts an optional UTF-8 BOM
//! and any line ending; writing always emits a BOM and CRLF line endings.

use std::{
    fs::File,
    io::{BufRead, Read, Write},
    path::Path,
};

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    error::Error,
    policy::ErrorPolicy,
    traits::{Parser, Writer},
    types::LocalizationTable,
};

pub const DELIMITER: char = '=';

lazy_static! {
    /// CRLF, LF and a lone CR all end a line.
    static ref LINE_BREAK_REGEX: Regex = Regex::new(r"\r\n|\r|\n").unwrap();
}

const UTF8_BOM: &str = "\u{feff}";
const LINE_ENDING: &str = "\r\n";

/// Characters stripped from both ends of a line before it is split.
/// Plain spaces are significant and kept.
const STRIP_CHARS: &[char] = &['\r', '\n', '\t', '\u{feff}'];

/// Result of splitting one line (or one sheet cell) into a key/value pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParsedLine<'a> {
    Blank,
    Pair(&'a str, &'a str),
    MissingSeparator(&'a str),
}

pub(crate) fn parse_line(line: &str) -> ParsedLine<'_> {
    let stripped = line.trim_matches(STRIP_CHARS);
    if stripped.is_empty() {
        return ParsedLine::Blank;
    }
    match stripped.split_once(DELIMITER) {
        Some((key, value)) => ParsedLine::Pair(key, value),
        None => ParsedLine::MissingSeparator(stripped),
    }
}

/// Renders an entry the way it appears in the flat file and in sheet cells.
pub fn key_value_text(key: &str, value: &str) -> String {
    format!("{key}{DELIMITER}{value}")
}

impl Parser for LocalizationTable {
    fn from_reader<R: BufRead>(mut reader: R, policy: &ErrorPolicy) -> Result<Self, Error> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        let mut table = LocalizationTable::new();
        for (index, line) in LINE_BREAK_REGEX.split(&content).enumerate() {
            match parse_line(line) {
                ParsedLine::Blank => {}
                ParsedLine::Pair(key, value) => table.set(key, value),
                ParsedLine::MissingSeparator(content) => policy.report(Error::MissingSeparator {
                    line: index + 1,
                    content: content.to_string(),
                })?,
            }
        }
        Ok(table)
    }

    /// Override default file reading to drop a leading byte-order mark.
    fn read_from<P: AsRef<Path>>(path: P, policy: &ErrorPolicy) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .build(file);

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).map_err(Error::Io)?;

        Self::from_str(&decoded, policy)
    }
}

impl Writer for LocalizationTable {
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut content = String::from(UTF8_BOM);
        for entry in self.entries() {
            content.push_str(&entry.to_string());
            content.push_str(LINE_ENDING);
        }
        writer.write_all(content.as_bytes()).map_err(Error::Io)
    }
}

impl LocalizationTable {
    /// Loads a flat `key=value` file.
    pub fn from_ini_file<P: AsRef<Path>>(path: P, policy: &ErrorPolicy) -> Result<Self, Error> {
        Self::read_from(path, policy)
    }

    /// Saves the table as a flat `key=value` file (UTF-8 BOM, CRLF).
    pub fn save_ini_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        self.write_to(path)
    }
}
