// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Every variant except `Other` is an operator-facing condition: the
//! dispatcher renders it with `Display` and sends it through the sink.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    /// The shell (or the working directory it should start in) could not be
    /// used to launch the command.
    #[error("{0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("This cmd is illegal.")]
    IllegalCommand,

    #[error("pid \"{0}\" not find")]
    TaskNotFound(String),

    #[error("No such file or directory: '{0}'")]
    DirectoryNotFound(String),

    #[error("internal error: task {0} is already registered")]
    RegistryInvariantViolation(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, RelayError>;
