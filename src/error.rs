use std::{io, path::PathBuf};
use thiserror::Error;

/// Everything that can go wrong while turning option assignments into a [`crate::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid host, port: {0}")]
    InvalidHostPort(String),

    #[error("Hostname too long: {0}")]
    HostnameTooLong(String),

    #[error("Port is invalid: {0}")]
    InvalidPort(String),

    #[error("{option}: invalid integer value: {value}")]
    InvalidNumber { option: &'static str, value: String },

    #[error("{option}: specify the integer in the range [0, {max}], inclusive")]
    OutOfRange { option: &'static str, max: u64 },

    #[error("Invalid severity level: {0}")]
    InvalidLogLevel(String),

    #[error("user: failed to get uid from {name}: {source}")]
    UnknownUser {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Bad configuration format at line {line}")]
    MalformedLine { line: usize },

    #[error("Invalid configuration at line {line}: {source}")]
    InvalidLine {
        line: usize,
        #[source]
        source: Box<ConfigError>,
    },

    #[error("Could not open config file {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read config file at line {line}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },
}

impl ConfigError {
    /// Line number the error was reported at, for errors raised by the file loader.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedLine { line }
            | Self::InvalidLine { line, .. }
            | Self::Read { line, .. } => Some(*line),
            _ => None,
        }
    }
}
