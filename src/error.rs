//! Error types for configuration and runs.
//!
//! Configuration problems are reported through [`ConfigError`], everything
//! that can go wrong while building the pool or running the workers through
//! [`Error`]. Both map to the process exit code used by the `secchi` binary.
//!
//! There is no recoverable runtime category: once the workers are running a
//! run either completes or fails with one of the fatal variants below.

use std::collections::TryReserveError;

use thiserror::Error;

/// Rejected configuration or command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `threads` must be an integer > 0.
    #[error("'0': is not an integer > 0 (threads)")]
    ZeroThreads,

    /// `size` must be an integer > 0.
    #[error("'0': is not an integer > 0 (size)")]
    ZeroBuckets,

    /// An option value could not be parsed.
    #[error("'{value}': is not a valid integer ({option})")]
    InvalidValue { option: String, value: String },

    /// Positional arguments left over after option parsing.
    #[error("Too many arguments: {}", .0.iter().map(|a| format!("'{a}'")).collect::<Vec<_>>().join(" "))]
    TrailingArguments(Vec<String>),

    /// Unknown flag or any other malformed command line.
    #[error("unrecognized option: {0}")]
    UnknownFlag(String),
}

impl ConfigError {
    /// Exit code reported by the binary, one per cause.
    ///
    /// The values are the two's complement of `-3`, `-2` and `-1`.
    pub fn exit_code(&self) -> u8 {
        match self {
            ConfigError::ZeroThreads | ConfigError::ZeroBuckets | ConfigError::InvalidValue { .. } => {
                253
            }
            ConfigError::TrailingArguments(_) => 254,
            ConfigError::UnknownFlag(_) => 255,
        }
    }
}

/// Unified error type for pool construction and runs.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration was rejected before anything was built.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Storage for buckets or worker bookkeeping could not be allocated.
    #[error("Not enough memory for {what}: {source}")]
    ResourceExhausted {
        what: &'static str,
        #[source]
        source: TryReserveError,
    },

    /// The OS refused to create a worker thread.
    #[error("Could not create thread #{worker}: {source}")]
    Spawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },

    /// A worker terminated by panicking.
    #[error("thread #{worker} panicked")]
    WorkerPanicked { worker: usize },

    /// A transfer named a bucket outside the pool.
    #[error("bucket index {index} out of range for pool of {size} buckets")]
    BucketOutOfRange { index: usize, size: usize },

    /// The summary could not be encoded as JSON.
    #[cfg(feature = "json")]
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Exit code reported by the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Config(err) => err.exit_code(),
            _ => 1,
        }
    }
}

/// Result type for pool and coordinator operations.
pub type Result<T> = std::result::Result<T, Error>;
