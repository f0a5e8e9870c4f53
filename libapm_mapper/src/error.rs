use std::path::PathBuf;
use thiserror::Error;

use super::worker_status::EntryStatus;

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Could not interpret value {0:?} as a number")]
    NotANumber(String),
    #[error("Could not interpret value {0:?} as an unsigned 32-bit integer")]
    NotAnUnsigned(String),
    #[error("Could not interpret value {0:?} as a boolean")]
    NotABoolean(String),
    #[error("Could not interpret value {0:?} as a UNIX timestamp")]
    NotATimestamp(String),
    #[error("UNIX timestamp {0} is outside of the representable range: {1}")]
    TimestampRange(i64, time::error::ComponentRange),
    #[error("Failed to format timestamp as ISO8601: {0}")]
    FormatError(#[from] time::error::Format),
}

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("Mapping table {0} has neither a prefix nor a prefix_trg")]
    MissingPrefix(&'static str),
    #[error("Mapping failed to convert source key {key}: {source}")]
    Conversion {
        key: String,
        source: ConversionError,
    },
    #[error("Mapping found records or nested lists under source key {0} which cannot be copied into the template")]
    UnsupportedValue(String),
}

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Failed to load metadata as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Metadata failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Metadata failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
    #[error("Metadata expected a YAML mapping at the document root")]
    RootNotMapping,
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Template failed to convert to yaml: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("Parser failed due to Metadata error: {0}")]
    MetadataError(#[from] MetadataError),
    #[error("Parser failed due to Mapping error: {0}")]
    MappingError(#[from] MappingError),
    #[error("Parser failed to compute the checksum of {0:?} due to IO error: {1}")]
    ChecksumError(PathBuf, std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
    #[error("Config does not list any entries to process")]
    NoEntries,
    #[error("Config contains invalid entry id {0}; entry ids start at 1")]
    InvalidEntryId(u32),
    #[error("Config lists entry id {0} more than once")]
    DuplicateEntryId(u32),
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Processor failed due to Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Processor failed due to Parser error: {0}")]
    ParserError(#[from] ParserError),
    #[error("Processor failed due to Template error: {0}")]
    TemplateError(#[from] TemplateError),
    #[error("Processor failed due to Send error: {0}")]
    SendError(#[from] std::sync::mpsc::SendError<EntryStatus>),
}
