//! Tutor error types.
//!
//! Storage and generation failures are fatal to the request that hit them
//! and propagate to the caller untouched. Malformed quiz blocks and degraded
//! knowledge lookups never surface here: they are absorbed where they occur.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while building a learning package or recording
/// quiz progress.
#[derive(Debug, Error)]
pub enum TutorError {
    /// The progress store is unreadable or holds a malformed structure.
    #[error("progress store {} is unreadable or corrupt: {message}", path.display())]
    Storage { path: PathBuf, message: String },

    /// The content generation backend failed.
    #[error("content generation failed: {0:#}")]
    Generation(#[source] anyhow::Error),

    /// A quiz record or question violates its invariants.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Settings are inconsistent (e.g. unordered thresholds).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TutorError {
    pub(crate) fn storage(path: &Path, message: impl Into<String>) -> Self {
        TutorError::Storage {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Returns `true` for errors caused by the persisted state rather than
    /// by the request itself.
    pub fn is_storage(&self) -> bool {
        matches!(self, TutorError::Storage { .. })
    }
}

/// Result alias used across the core crate.
pub type Result<T> = std::result::Result<T, TutorError>;
