//! Error types for TextBook
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::format::PostId;

/// Result type alias using TextBookError
pub type Result<T> = std::result::Result<T, TextBookError>;

/// Unified error type for TextBook operations
///
/// Out-of-range indexes are not errors: they surface as `None` / `false`
/// from the store operations.
#[derive(Debug, Error)]
pub enum TextBookError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Argument Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    #[error("Corrupt record in {}: {reason}", .path.display())]
    CorruptRecord { path: PathBuf, reason: String },

    #[error("Recovery failed{}: {reason}", post_label(.id))]
    RecoveryFailure { id: Option<PostId>, reason: String },

    #[error("No post ids left after {0}")]
    IdsExhausted(PostId),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

fn post_label(id: &Option<PostId>) -> String {
    match id {
        Some(id) => format!(" for post {:05}", id),
        None => String::new(),
    }
}

impl TextBookError {
    /// Build an `InvalidArgument` error
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build a `CorruptRecord` error for the given file
    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::CorruptRecord {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build a `RecoveryFailure` error
    pub(crate) fn recovery(id: Option<PostId>, reason: impl Into<String>) -> Self {
        Self::RecoveryFailure {
            id,
            reason: reason.into(),
        }
    }
}
