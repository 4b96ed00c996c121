//! Error handling for the devyaml CLI.
//!
//! Every failure a command can hit ends up as a [`CliError`], which knows
//! its suggestions, its category and therefore its exit code.

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use devyaml_blocks::{BlockError, BlockErrorCategory};

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input (bad combination of arguments and files).
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    // ── Inputs and outputs ─────────────────────────────────────────────────
    #[error("Input not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("No manifests (*.toml) found under {}", path.display())]
    NoManifests { path: PathBuf },

    /// Refusing to clobber a file without `--force`.
    #[error("Output already exists: {}", path.display())]
    OutputExists { path: PathBuf },

    /// Some manifests in a directory run failed; each was reported already.
    #[error("{failed} of {total} manifests failed")]
    BatchFailed { failed: usize, total: usize },

    // ── Config errors ──────────────────────────────────────────────────────
    #[error("Unknown configuration key '{key}'")]
    UnknownConfigKey { key: String },

    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    // ── Library errors ─────────────────────────────────────────────────────
    /// A manifest could not be read, built or validated.
    #[error(transparent)]
    Blocks(#[from] BlockError),

    // ── System errors ──────────────────────────────────────────────────────
    /// An I/O operation failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// A document could not be serialised for `--emit json`.
    #[error("Serialization failed: {message}")]
    Serialize {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            source: None,
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message, .. } => vec![
                format!("Check your input: {message}"),
                "Use --help for usage information".into(),
            ],

            Self::InputNotFound { path } => vec![
                format!("'{}' does not exist", path.display()),
                "Pass a manifest file or a directory containing *.toml manifests".into(),
            ],

            Self::NoManifests { path } => vec![
                format!("'{}' contains no *.toml files", path.display()),
                "Manifests are searched for recursively".into(),
            ],

            Self::OutputExists { path } => vec![
                format!("'{}' would be overwritten", path.display()),
                "Use --force to overwrite it".into(),
                "Or choose a different output path with -o / --out-dir".into(),
            ],

            Self::BatchFailed { .. } => vec![
                "See the messages above for each failing manifest".into(),
                "Run 'devyaml check <file>' on one manifest for details".into(),
            ],

            Self::UnknownConfigKey { key } => vec![
                format!("'{key}' is not a configuration key"),
                "List every key with: devyaml config list".into(),
                "Keys are dotted paths, e.g. defaults.platform".into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {message}"),
                "Check the file shown by: devyaml config path".into(),
                "Use 'devyaml init --force' to recreate a default config".into(),
            ],

            Self::Blocks(err) => err.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {message}"),
                "Check file permissions".into(),
                "Ensure the parent directory exists".into(),
            ],

            Self::Serialize { .. } => vec![
                "This is a bug; please report it with the manifest that triggered it".into(),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. }
            | Self::OutputExists { .. }
            | Self::BatchFailed { .. }
            | Self::UnknownConfigKey { .. } => ErrorCategory::UserError,
            Self::InputNotFound { .. } | Self::NoManifests { .. } => ErrorCategory::NotFound,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Blocks(err) => match err.category() {
                BlockErrorCategory::Validation | BlockErrorCategory::Parse => {
                    ErrorCategory::UserError
                }
                BlockErrorCategory::NotFound => ErrorCategory::NotFound,
                BlockErrorCategory::Io | BlockErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } | Self::Serialize { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));
        output.push_str(&format!("  {}\n", self.to_string().red()));

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {suggestion}\n"));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(), // ℹ
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`], no ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {self}\n"));

        if verbose {
            let mut src = self.source();
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments).
    UserError,
    /// Resource not found.
    NotFound,
    /// Configuration error.
    Configuration,
    /// Internal/system error.
    Internal,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Converts foreign errors into [`CliError`] at call-sites, attaching a
/// context message.
///
/// Concrete impls only: a blanket impl would overlap with both.
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

impl<T> IntoCli<T> for Result<T, serde_json::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::Serialize {
            message: f().into(),
            source: e,
        })
    }
}
