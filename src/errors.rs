//! Typed error definitions for datesort.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrganizeError {
    #[error("Source path does not exist or is not a directory: {0}")]
    InvalidSource(PathBuf),

    #[error("Target directory cannot be inside the source directory: {0}")]
    InvalidTarget(PathBuf),

    #[error("Size filter bounds are inverted: min {min} > max {max}")]
    InvalidSizeBounds { min: u64, max: u64 },

    #[error("No recorded run to undo; state file not found: {0}")]
    StateNotFound(PathBuf),

    #[error("Last run was already undone at {0}")]
    AlreadyUndone(String),

    #[error("Unsupported {field}: '{value}'")]
    UnsupportedValue { field: &'static str, value: String },
}

impl OrganizeError {
    /// Stable machine-readable kind, used in structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            OrganizeError::InvalidSource(_) => "invalid_source",
            OrganizeError::InvalidTarget(_) => "invalid_target",
            OrganizeError::InvalidSizeBounds { .. } => "invalid_size_bounds",
            OrganizeError::StateNotFound(_) => "state_not_found",
            OrganizeError::AlreadyUndone(_) => "already_undone",
            OrganizeError::UnsupportedValue { .. } => "unsupported_value",
        }
    }
}
