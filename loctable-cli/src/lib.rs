//! CLI library for testing purposes

pub mod check;
pub mod config;
pub mod init;
pub mod inputs;
pub mod merge;
pub mod sheet;
pub mod split;
pub mod transform;
pub mod validation;

pub use config::{CONFIG_FILE_NAME, ConvertConfig};
