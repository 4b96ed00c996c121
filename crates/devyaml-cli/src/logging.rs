//! Diagnostics for a devyaml run, written to stderr.
//!
//! The document crates emit events, such as a block replaced by a later
//! definition, but never install a subscriber. This
//! module does that once per process.
//!
//! Without flags only warnings show, so `devyaml render dev.toml > out.yaml`
//! stays quiet. Each `-v` lowers the threshold one step from `info` to
//! `trace`, and `--quiet` keeps errors alone. A `RUST_LOG` value in the
//! environment or `.env` replaces the derived filter entirely.

use std::io::IsTerminal as _;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::GlobalArgs;

/// Crates whose events pass the filter at the chosen level.
const LOG_TARGETS: [&str; 3] = ["devyaml", "devyaml_core", "devyaml_blocks"];

/// Install the stderr subscriber for this process.
///
/// Call before the first command runs; a second call fails.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directives(args)));

    let use_ansi = !args.no_color && std::io::stderr().is_terminal();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(use_ansi)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Could not set up devyaml logging: {e}"))?;

    Ok(())
}

/// One `crate=level` directive per devyaml crate, so dependency noise stays out.
fn filter_directives(args: &GlobalArgs) -> String {
    let level = derive_level(args);
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// `--quiet` wins over any number of `-v`.
fn derive_level(args: &GlobalArgs) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    fn args_with(verbose: u8, quiet: bool) -> GlobalArgs {
        GlobalArgs {
            verbose,
            quiet,
            no_color: true,
            config: None,
            output_format: OutputFormat::Auto,
        }
    }

    #[test]
    fn level_quiet() {
        assert_eq!(derive_level(&args_with(0, true)), "error");
    }

    #[test]
    fn level_default() {
        assert_eq!(derive_level(&args_with(0, false)), "warn");
    }

    #[test]
    fn level_verbose_counts() {
        assert_eq!(derive_level(&args_with(1, false)), "info");
        assert_eq!(derive_level(&args_with(2, false)), "debug");
        assert_eq!(derive_level(&args_with(3, false)), "trace");
        assert_eq!(derive_level(&args_with(10, false)), "trace");
    }

    #[test]
    fn quiet_overrides_verbose() {
        assert_eq!(derive_level(&args_with(3, true)), "error");
    }

    #[test]
    fn directives_cover_every_crate() {
        assert_eq!(
            filter_directives(&args_with(2, false)),
            "devyaml=debug,devyaml_core=debug,devyaml_blocks=debug"
        );
    }
}
