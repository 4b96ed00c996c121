// ============================================================================
// error.rs - BLOCK AND MANIFEST ERRORS
// ============================================================================

use std::path::PathBuf;

use devyaml_core::error::DocumentError;
use thiserror::Error;

use crate::schema::BLOCK_REGISTRY;

/// Errors raised while building blocks, assembling a device or reading a
/// manifest.
///
/// All errors are:
/// - Cloneable (a batch run collects them per file)
/// - Categorizable (for CLI display and exit codes)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BlockError {
    // ========================================================================
    // Schema Errors
    // ========================================================================
    #[error("unknown block '{block}'")]
    UnknownBlock { block: String },

    #[error("block '{block}' has no field '{field}'")]
    UnknownField { block: String, field: String },

    #[error("block '{block}' is missing required field '{field}'")]
    MissingRequiredField {
        block: &'static str,
        field: &'static str,
    },

    #[error("invalid value for '{block}.{field}': {reason}")]
    InvalidValue {
        block: String,
        field: String,
        reason: String,
    },

    #[error("invalid block '{block}': {reason}")]
    InvalidBlock { block: String, reason: String },

    // ========================================================================
    // Device Errors
    // ========================================================================
    #[error("block '{block}' is defined more than once")]
    DuplicateBlock { block: String },

    #[error("device has no '{block}' block")]
    MissingBlock { block: &'static str },

    #[error("blocks '{first}' and '{second}' cannot be used together")]
    ConflictingBlocks {
        first: &'static str,
        second: &'static str,
    },

    // ========================================================================
    // Manifest Errors
    // ========================================================================
    #[error("failed to read manifest '{}': {message}", path.display())]
    ManifestRead { path: PathBuf, message: String },

    #[error("failed to parse manifest: {0}")]
    ManifestParse(String),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl BlockError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownBlock { block } => {
                let mut hints = vec![format!("'{block}' is not a known component")];
                hints.extend(closest_block(block).map(|b| format!("Did you mean '{b}'?")));
                hints.push("Try: devyaml blocks".into());
                hints
            }
            Self::UnknownField { block, .. } => vec![
                format!("Check the field names accepted by '{block}'"),
                format!("Try: devyaml blocks {block}"),
            ],
            Self::MissingRequiredField { block, field } => vec![
                format!("Add '{field}' to the [{block}] table"),
            ],
            Self::InvalidValue { reason, .. } => vec![reason.clone()],
            Self::InvalidBlock { block, .. } => vec![format!(
                "Write '{block}' as a table: [{block}], or [[{block}]] for repeated components"
            )],
            Self::DuplicateBlock { block } => {
                vec![format!("Merge the '{block}' definitions into one")]
            }
            Self::MissingBlock { block } => vec![
                format!("Add a [{block}] table to the manifest"),
                "Or set a default in config: devyaml config get defaults.platform".into(),
            ],
            Self::ConflictingBlocks { first, second } => {
                vec![format!("Keep either '{first}' or '{second}', not both")]
            }
            Self::ManifestRead { path, .. } => vec![
                format!("Check that '{}' exists and is readable", path.display()),
            ],
            Self::ManifestParse(_) => vec!["Manifests are TOML; check the syntax near the reported line".into()],
            Self::Document(e) => e.suggestions(),
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> BlockErrorCategory {
        match self {
            Self::UnknownField { .. }
            | Self::MissingRequiredField { .. }
            | Self::InvalidValue { .. }
            | Self::InvalidBlock { .. }
            | Self::DuplicateBlock { .. }
            | Self::MissingBlock { .. }
            | Self::ConflictingBlocks { .. } => BlockErrorCategory::Validation,
            Self::UnknownBlock { .. } => BlockErrorCategory::NotFound,
            Self::ManifestParse(_) => BlockErrorCategory::Parse,
            Self::ManifestRead { .. } => BlockErrorCategory::Io,
            Self::Document(_) => BlockErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockErrorCategory {
    Validation,
    NotFound,
    Parse,
    Io,
    Internal,
}

/// Result alias for block operations.
pub type BlockResult<T> = Result<T, BlockError>;

/// The registered block whose name shares the longest prefix with `name`.
fn closest_block(name: &str) -> Option<&'static str> {
    BLOCK_REGISTRY
        .iter()
        .map(|schema| {
            let common = schema
                .name
                .chars()
                .zip(name.chars())
                .take_while(|(a, b)| a == b)
                .count();
            (common, schema.name)
        })
        .filter(|(common, _)| *common >= 3)
        .max_by_key(|(common, _)| *common)
        .map(|(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_block_suggests_close_name() {
        let err = BlockError::UnknownBlock {
            block: "sensors".into(),
        };
        assert_eq!(err.category(), BlockErrorCategory::NotFound);
        assert!(err.suggestions().iter().any(|s| s.contains("'sensor'")));
    }

    #[test]
    fn unrelated_name_gets_no_guess() {
        let err = BlockError::UnknownBlock { block: "zz".into() };
        assert!(!err.suggestions().iter().any(|s| s.starts_with("Did you mean")));
    }

    #[test]
    fn missing_field_message_names_block_and_field() {
        let err = BlockError::MissingRequiredField {
            block: "wifi",
            field: "ssid",
        };
        assert_eq!(err.to_string(), "block 'wifi' is missing required field 'ssid'");
        assert_eq!(err.category(), BlockErrorCategory::Validation);
    }

    #[test]
    fn document_errors_pass_through() {
        let err: BlockError = DocumentError::PathNotFound { path: "x".into() }.into();
        assert_eq!(err.to_string(), "no node at 'x'");
        assert_eq!(err.category(), BlockErrorCategory::Internal);
    }
}
