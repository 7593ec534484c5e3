//! Engine error types

use std::io;
use thiserror::Error;

/// Error type shared across the engine crates
#[derive(Debug, Error)]
pub enum EngineError {
    /// IO error reading or writing a note
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Front-matter parsing failed
    #[error("Front-matter parse error: {0}")]
    Frontmatter(String),

    /// Invalid vault or note path
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A slug or path did not resolve to a note
    #[error("Note not found: {0}")]
    NoteNotFound(String),
}

/// Specialized Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Create a front-matter error
    pub fn frontmatter(msg: impl Into<String>) -> Self {
        Self::Frontmatter(msg.into())
    }

    /// Create an invalid-path error
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    /// Create a note-not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NoteNotFound(msg.into())
    }

    /// Check if this error is recoverable (degrades visually instead of
    /// aborting the render pass)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Frontmatter(_) | Self::NoteNotFound(_))
    }

    /// Check if this error is fatal for the current operation
    pub fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }
}
