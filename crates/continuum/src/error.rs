//! Error types for Continuum

use std::path::PathBuf;

use thiserror::Error;

use crate::voice::VoiceError;

/// Main error type for Continuum operations
#[derive(Error, Debug)]
pub enum ContinuumError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Profile storage errors (locking, layout)
    #[error("Storage error: {0}")]
    Storage(String),

    /// A required profile file or directory does not exist yet
    #[error("{} not found. Run `continuum init` first.", .0.display())]
    NotInitialized(PathBuf),

    /// Voice analysis errors
    #[error(transparent)]
    Voice(#[from] VoiceError),

    /// Tool-call argument errors
    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ContinuumError {
    fn from(e: serde_json::Error) -> Self {
        ContinuumError::Serialization(e.to_string())
    }
}

/// Result type alias for Continuum operations
pub type Result<T> = std::result::Result<T, ContinuumError>;
