use std::io;
use std::str::Utf8Error;
use thiserror::Error;

pub use crate::node_id::table::TableError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No explicit config path given and no per-user config directory available")]
    NoConfigPath,

    #[error("Failed to encode/decode config as utf-8: {source}")]
    Utf8Error { #[from] source: Utf8Error },

    #[error("Failed to read/write config file: {source}")]
    IOError { #[from] source: io::Error },

    #[error("Failed to parse/build config file: {source}")]
    JsonError { #[from] source: serde_json::Error },

    #[error("eventBuffer {value} exceeds the maximum of {max}")]
    EventBufferTooLarge { value: usize, max: usize },
}

impl ConfigError {
    pub fn is_file_not_found_error(&self) -> bool {
        matches!(self, ConfigError::IOError { source } if source.kind() == io::ErrorKind::NotFound)
    }
}

#[derive(Error, Debug)]
pub enum AppRunError {
    #[error("Failed to start application (config): {source}")]
    ConfigError { #[from] source: ConfigError },

    #[error("Failed to run application (io): {source}")]
    IOError { #[from] source: io::Error },

    #[error("Failed to start device: {source}")]
    DeviceError { #[from] source: DeviceError },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("Device {name:?} has already been started")]
    AlreadyStarted { name: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeIdError {
    #[error("Node id is empty")]
    Empty,

    #[error("Namespace prefix of {input:?} is not terminated by ';'")]
    MissingNamespaceTerminator { input: String },

    #[error("{value:?} is not a valid namespace index")]
    InvalidNamespace { value: String },

    #[error("{value:?} is not a valid numeric id")]
    InvalidNumericId { value: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command {command:?}, try \"help\"")]
    UnknownCommand { command: String },

    #[error("Command {command:?} expects an argument")]
    MissingArgument { command: String },

    #[error("Command {command:?} takes no arguments")]
    UnexpectedArgument { command: String },
}
