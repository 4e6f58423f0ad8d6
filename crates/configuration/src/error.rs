//! Errors that can occur while loading configuration.

use std::path::PathBuf;

use crate::environment;

/// The errors that can be thrown when reading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ParseConfigurationError {
    #[error("parse error on {file_path}:{line}:{column}: {message}")]
    ParseError {
        file_path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// The errors that can be thrown when writing a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum WriteParsedConfigurationError {
    #[error("{0} is not a directory")]
    DirectoryIsNotADirectory(PathBuf),

    #[error("error serializing the configuration: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// The errors that can be thrown when turning a parsed configuration into a runtime one.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum MakeRuntimeConfigurationError {
    #[error("missing environment variable when processing {attempted_to_resolve}: {source}")]
    MissingEnvironmentVariable {
        attempted_to_resolve: String,
        #[source]
        source: environment::Error,
    },

    #[error("invalid value for {setting}: {message}")]
    InvalidValue { setting: String, message: String },
}
