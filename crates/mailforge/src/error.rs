//! Error types for rendering and message assembly.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while rendering or packaging a document.
#[derive(Debug, Error)]
pub enum Error {
    /// A resource (image file, config file) could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// MIME assembly failed.
    #[error("MIME error: {0}")]
    Mime(#[from] mailforge_mime::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
