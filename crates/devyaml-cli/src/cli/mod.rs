//! CLI argument definitions using the clap derive API.
//!
//! Only argument names, help text and value enums live here. The command
//! handlers under `commands/` do the work.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name     = "devyaml",
    bin_name = "devyaml",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Render device manifests to deterministic YAML",
    long_about = "devyaml turns TOML device manifests into ESPHome-style YAML \
                  with stable key order, comments and secret references.",
    after_help = "EXAMPLES:\n\
        \x20 devyaml render porch.toml\n\
        \x20 devyaml render devices/ --out-dir build/\n\
        \x20 devyaml check porch.toml\n\
        \x20 devyaml blocks --format list",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render manifests to YAML (or JSON).
    #[command(
        visible_alias = "r",
        about = "Render manifests to YAML",
        after_help = "EXAMPLES:\n\
            \x20 devyaml render porch.toml                  # print to stdout\n\
            \x20 devyaml render porch.toml -o porch.yaml\n\
            \x20 devyaml render devices/ --out-dir build/   # every *.toml\n\
            \x20 devyaml render porch.toml --emit json"
    )]
    Render(RenderArgs),

    /// Build and validate manifests without writing anything.
    #[command(
        about = "Validate manifests",
        after_help = "EXAMPLES:\n\
            \x20 devyaml check porch.toml\n\
            \x20 devyaml check devices/"
    )]
    Check(CheckArgs),

    /// List the known blocks and their fields.
    #[command(
        visible_alias = "ls",
        about = "List available blocks",
        after_help = "EXAMPLES:\n\
            \x20 devyaml blocks\n\
            \x20 devyaml blocks wifi\n\
            \x20 devyaml blocks --format json"
    )]
    Blocks(BlocksArgs),

    /// Initialise a devyaml configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 devyaml init           # default location\n\
            \x20 devyaml init --global  # global config\n\
            \x20 devyaml init --local   # .devyaml.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 devyaml completions bash > ~/.local/share/bash-completion/completions/devyaml\n\
            \x20 devyaml completions zsh  > ~/.zfunc/_devyaml\n\
            \x20 devyaml completions fish > ~/.config/fish/completions/devyaml.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the devyaml configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 devyaml config get defaults.platform\n\
            \x20 devyaml config list\n\
            \x20 devyaml config path"
    )]
    Config(ConfigCommands),
}

// ── render ────────────────────────────────────────────────────────────────────

/// Arguments for `devyaml render`.
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// A manifest file, or a directory searched recursively for `*.toml`.
    #[arg(value_name = "INPUT", help = "Manifest file or directory")]
    pub input: PathBuf,

    /// Write a single rendered file here instead of stdout.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        conflicts_with = "out_dir",
        help = "Output file (single manifest only)"
    )]
    pub output: Option<PathBuf>,

    /// Directory receiving one rendered file per manifest.
    #[arg(
        long = "out-dir",
        value_name = "DIR",
        help = "Output directory (mirrors the input layout)"
    )]
    pub out_dir: Option<PathBuf>,

    #[arg(
        long = "emit",
        value_enum,
        default_value = "yaml",
        help = "Output document format"
    )]
    pub emit: EmitFormat,

    /// Overwrite files that already exist.
    #[arg(short = 'f', long = "force", help = "Overwrite existing output files")]
    pub force: bool,

    /// Render even if the device is incomplete.
    #[arg(long = "no-validate", help = "Skip device validation")]
    pub no_validate: bool,
}

/// Document format produced by `render`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum EmitFormat {
    /// Indented YAML text.
    #[default]
    Yaml,
    /// The node tree as pretty-printed JSON.
    Json,
}

// ── check ─────────────────────────────────────────────────────────────────────

/// Arguments for `devyaml check`.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// A manifest file, or a directory searched recursively for `*.toml`.
    #[arg(value_name = "INPUT", help = "Manifest file or directory")]
    pub input: PathBuf,
}

// ── blocks ────────────────────────────────────────────────────────────────────

/// Arguments for `devyaml blocks`.
#[derive(Debug, Args)]
pub struct BlocksArgs {
    /// Show the fields of a single block.
    #[arg(value_name = "BLOCK", help = "Block to describe")]
    pub name: Option<String>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `blocks` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `devyaml init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to the global config location.
    #[arg(
        long = "global",
        conflicts_with = "local",
        help = "Create global configuration"
    )]
    pub global: bool,

    /// Write to `.devyaml.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `devyaml completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `devyaml config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.platform`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn render_defaults_to_yaml_on_stdout() {
        let cli = Cli::try_parse_from(["devyaml", "render", "porch.toml"]).unwrap();
        match cli.command {
            Commands::Render(args) => {
                assert_eq!(args.input, PathBuf::from("porch.toml"));
                assert_eq!(args.emit, EmitFormat::Yaml);
                assert!(args.output.is_none());
                assert!(args.out_dir.is_none());
                assert!(!args.force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn output_conflicts_with_out_dir() {
        let result = Cli::try_parse_from([
            "devyaml", "render", "devices", "-o", "a.yaml", "--out-dir", "build",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from(["devyaml", "check", "x.toml", "-vv", "--no-color"]).unwrap();
        assert_eq!(cli.global.verbose, 2);
        assert!(cli.global.no_color);
    }

    #[test]
    fn global_flag_help_names_devyaml_behavior() {
        let cmd = Cli::command();
        let help = |id: &str| {
            cmd.get_arguments()
                .find(|arg| arg.get_id() == id)
                .and_then(|arg| arg.get_help())
                .map(ToString::to_string)
                .unwrap_or_default()
        };
        assert!(help("config").contains("devyaml.toml"));
        assert!(help("quiet").contains("rendered output"));
        assert!(help("output_format").contains("check"));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["devyaml", "blocks", "-q", "-v"]).is_err());
    }

    #[test]
    fn blocks_alias_and_format() {
        let cli = Cli::try_parse_from(["devyaml", "ls", "--format", "json"]).unwrap();
        match cli.command {
            Commands::Blocks(args) => {
                assert_eq!(args.format, ListFormat::Json);
                assert!(args.name.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn init_global_and_local_conflict() {
        assert!(Cli::try_parse_from(["devyaml", "init", "--global", "--local"]).is_err());
    }
}
