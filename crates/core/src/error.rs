//! Error types for indicators and type resolution

use std::path::PathBuf;
use thiserror::Error;

/// Failure raised by an indicator or its type
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// Constructor parameters do not fit the implementation
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// Host probing for preferred parameters found nothing usable
    #[error("cannot infer parameters: {0}")]
    Inference(String),

    /// A configured device (interface, mount point) is not present
    #[error("device not found: {0}")]
    MissingDevice(String),

    #[error("collect failed: {0}")]
    Collect(String),

    #[error("update failed: {0}")]
    Update(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IndicatorError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A configured type identifier could not be turned into an implementation
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("unknown indicator type `{id}` (plugin search path: {searched:?})")]
    NotFound { id: String, searched: Vec<PathBuf> },

    #[error("`{id}` declared in {origin:?} is not a usable indicator: {reason}")]
    InvalidImplementation {
        id: String,
        origin: PathBuf,
        reason: String,
    },
}
