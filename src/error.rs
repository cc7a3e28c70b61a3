//! Error types for extended-unrar
//!
//! The extraction engine itself never returns these to the host: failures inside
//! a run are narrated and folded into [`RunStatus`](crate::types::RunStatus).
//! They surface from the preflight gate and from the individual building blocks
//! (scanner, invoker, cleanup) so each can be tested on its own.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for extended-unrar operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for extended-unrar
#[derive(Debug, Error)]
pub enum Error {
    /// Host configuration error with context about which option is at fault
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The host option that caused the error (e.g., "NZBPO_WAITTIME")
        key: Option<String>,
    },

    /// Post-processing error (extract, cleanup)
    #[error("post-processing error: {0}")]
    PostProcess(#[from] PostProcessError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// External tool could not be started (missing binary, permission denied, empty command)
    #[error("external tool error: {0}")]
    ExternalTool(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error tied to a specific host option
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}

/// Post-processing errors (extraction, leftover cleanup)
#[derive(Debug, Error)]
pub enum PostProcessError {
    /// Archive extraction failed
    #[error("extraction failed for {archive}: {reason}")]
    ExtractionFailed {
        /// The archive file that failed to extract
        archive: PathBuf,
        /// The reason extraction failed
        reason: String,
    },

    /// Removing an extracted archive part failed
    #[error("cleanup failed for {path}: {reason}")]
    CleanupFailed {
        /// The leftover file that could not be removed
        path: PathBuf,
        /// The reason removal failed
        reason: String,
    },
}
