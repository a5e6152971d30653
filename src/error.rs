//! Error types

use crate::config::ConfigError;
use crate::core::Handle;
use crate::format::FormatError;

/// Errors surfaced by a [`Session`](crate::session::Session)
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Writing to the output or reading the input failed. The screen may no
    /// longer match the recorded history.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// An error-severity message was printed. The message is on screen and
    /// in the history; the caller decides how to recover.
    #[error("{message}")]
    Reported { message: String, handle: Handle },

    #[error("Cannot parse response: {0:?}")]
    UnrecognizedResponse(String),
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, Error>;
