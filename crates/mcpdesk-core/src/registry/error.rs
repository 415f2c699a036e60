use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by [`ConfigRegistry`](super::ConfigRegistry).
///
/// A missing configuration file and a backup with nothing to copy are not
/// errors; they surface as `Ok(None)`.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The configuration file exists but is not a valid document.
    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl RegistryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
