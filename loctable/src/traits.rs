//! Traits for format-agnostic parsing and serialization in loctable.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Cursor, Write},
    path::Path,
};

use crate::{error::Error, policy::ErrorPolicy};

/// A trait for parsing localization data from one file or stream.
///
/// Structural failures inside the stream go through the supplied [`ErrorPolicy`].
///
/// # Example
///
/// ```rust,no_run
/// use loctable::{ErrorPolicy, LocalizationTable, traits::{Parser, Writer}};
/// let table = LocalizationTable::read_from("global.ini", &ErrorPolicy::strict())?;
/// table.write_to("global_copy.ini")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R, policy: &ErrorPolicy) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    fn read_from<P: AsRef<Path>>(path: P, policy: &ErrorPolicy) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader, policy)
    }

    /// Parse from a string.
    fn from_str(s: &str, policy: &ErrorPolicy) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s), policy)
    }

    /// Parse from bytes.
    fn from_bytes(bytes: &[u8], policy: &ErrorPolicy) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(bytes), policy)
    }
}

/// A trait for writing localization data to one file or stream.
pub trait Writer {
    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Write to file path.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
