//! Crate-wide error type.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the simulator's lifecycle, configuration, and export paths.
///
/// Reading generation and store access cannot fail; everything here comes
/// from misuse of the lifecycle or from the process boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// The scenario configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// `start` was called while a previous run is still active.
    #[error("simulation is already running; stop it before starting a new run")]
    AlreadyRunning,

    /// A lifecycle argument is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Background tasks were requested outside a tokio runtime.
    #[error("no tokio runtime available: {0}")]
    Runtime(#[from] tokio::runtime::TryCurrentError),

    /// Filesystem or socket failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
