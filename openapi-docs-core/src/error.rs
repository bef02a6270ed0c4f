//! Error types for the docs pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::contract::StorageError;
use crate::merge::MergeError;
use crate::render::RenderError;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, DocsError>;

/// Every failure is fatal to the run; the variants only shape the message.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Missing or unusable configuration input.
    #[error("configuration error: {0}")]
    Config(String),

    /// A list, get or put against the bucket failed.
    #[error("storage error for {key}: {source}")]
    Storage {
        /// Key or prefix the operation addressed.
        key: String,
        #[source]
        source: StorageError,
    },

    /// Reading or writing a local artifact failed.
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored definition could not be decoded.
    #[error("failed to decode definition of service '{service}': {reason}")]
    Decode { service: String, reason: String },

    #[error(transparent)]
    Merge(#[from] MergeError),

    /// The merged specification could not be serialized.
    #[error("failed to serialize merged specification: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl DocsError {
    pub(crate) fn storage(key: impl Into<String>, source: StorageError) -> Self {
        DocsError::Storage {
            key: key.into(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DocsError::Io {
            path: path.into(),
            source,
        }
    }
}
