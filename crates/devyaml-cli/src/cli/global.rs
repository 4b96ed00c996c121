//! Flags shared by `render`, `check`, `blocks` and the other subcommands.
//!
//! None of them changes what a device document contains. They control the
//! diagnostics on stderr, the status lines around a render, and which
//! `devyaml.toml` supplies defaults.

use std::path::PathBuf;

use clap::Args;

/// Accepted before or after any subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Number of `-v` flags; see [`crate::logging`] for the levels.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Show more diagnostics on stderr (repeatable)",
        long_help = "Show more diagnostics on stderr. Repeat for more detail:
    -v      manifests rendered and platform defaults filled in
    -vv     manifests parsed, blocks built and files written
    -vvv    every block rendered and every field default applied"
    )]
    pub verbose: u8,

    /// Drop status lines. Rendered YAML on stdout is still printed.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Only print rendered output and errors"
    )]
    pub quiet: bool,

    /// Plain status symbols and log lines. Also set by `NO_COLOR`.
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        help = "Never color status lines or logs"
    )]
    pub no_color: bool,

    /// An explicit `devyaml.toml`, checked before the per-user file.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Read defaults from this devyaml.toml"
    )]
    pub config: Option<PathBuf>,

    /// Shape of status lines and of the `check` report.
    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "Status and report format (json makes `check` print a JSON report)"
    )]
    pub output_format: OutputFormat,
}

/// Format for everything devyaml prints besides the documents themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `output.format` from config, else human on a terminal and plain when piped.
    #[default]
    Auto,
    /// Colored `✓`/`✗` status lines.
    Human,
    /// The same lines without color.
    Plain,
    /// One JSON object per `check` run.
    Json,
}
