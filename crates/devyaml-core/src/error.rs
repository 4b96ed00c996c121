//! Error handling for devyaml Core.
//!
//! Rendering never fails for a well-formed tree, so the only errors here
//! come from the mutation and lookup API: asking a scalar for children,
//! or following a path that does not exist.

use thiserror::Error;

/// Errors raised while assembling or navigating a node tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// A mapping operation was attempted on a scalar or sequence.
    #[error("'{path}' is a {found}, not a mapping")]
    NotAMapping { path: String, found: &'static str },

    /// A sequence operation was attempted on a scalar or mapping.
    #[error("'{path}' is a {found}, not a sequence")]
    NotASequence { path: String, found: &'static str },

    /// A key along a lookup path is missing.
    #[error("no node at '{path}'")]
    PathNotFound { path: String },

    /// A numeric path segment points past the end of a sequence.
    #[error("index {index} out of range at '{path}' (length {len})")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },
}

impl DocumentError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NotAMapping { path, found } => vec![
                format!("'{path}' holds a {found}; only mappings have named children"),
                "Replace the value with a mapping before adding keys to it".into(),
            ],
            Self::NotASequence { path, found } => vec![
                format!("'{path}' holds a {found}; only sequences accept items"),
                "Create the key as a sequence first".into(),
            ],
            Self::PathNotFound { path } => vec![
                format!("Nothing is defined at '{path}'"),
                "Check the spelling of each dotted segment".into(),
            ],
            Self::IndexOutOfRange { len, .. } => {
                vec![format!("Valid indices are 0..{len}")]
            }
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotAMapping { .. } | Self::NotASequence { .. } => ErrorCategory::Structural,
            Self::PathNotFound { .. } | Self::IndexOutOfRange { .. } => ErrorCategory::NotFound,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Structural,
    NotFound,
}

/// Convenient result type alias.
pub type DocumentResult<T> = Result<T, DocumentError>;
