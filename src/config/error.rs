use std::path::PathBuf;
use thiserror::Error;

/// Failure loading, validating or writing the config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config in {path}: {reason}")]
    Validation { path: PathBuf, reason: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serialize config: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Default settings could not be synthesized for a built-in indicator
    #[error("cannot build default settings for {type_id}: {reason}")]
    Bootstrap { type_id: String, reason: String },

    #[error("cannot determine the user's home directory")]
    NoHome,
}

impl ConfigError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The file simply is not there yet
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
