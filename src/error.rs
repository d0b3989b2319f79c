//! Error taxonomy for corpus processing.
//!
//! Only [`PensieveError::Configuration`] is fatal for a corpus pass. Source
//! reads, paragraph annotation, and external lookups are logged and absorbed
//! where they happen so that partial output is still produced.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PensieveError {
    /// A document file could not be read or decoded.
    #[error("failed to read source {}: {source}", path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The language analyzer rejected a paragraph.
    #[error("annotation failed for paragraph {paragraph}: {message}")]
    Annotation { paragraph: usize, message: String },

    /// Image search or mood lookup failed.
    #[error("{service} failed: {message}")]
    ExternalService {
        service: &'static str,
        message: String,
    },

    /// Invalid settings, detected before any processing begins.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PensieveError {
    pub fn external(service: &'static str, message: impl ToString) -> Self {
        Self::ExternalService {
            service,
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PensieveError>;
