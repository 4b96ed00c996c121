//! `devyaml check`: build and validate manifests without writing.

use std::path::PathBuf;

use serde::Serialize;
use tracing::instrument;

use crate::{
    cli::{CheckArgs, OutputFormat},
    commands::{collect_inputs, load_device},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Outcome for one manifest, as printed with `--output-format json`.
#[derive(Debug, Serialize)]
struct CheckReport {
    path: PathBuf,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    platform: Option<&'static str>,
    blocks: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[instrument(skip_all, fields(input = %args.input.display()))]
pub fn execute(args: CheckArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let manifests = collect_inputs(&args.input)?;
    let json = output.format() == OutputFormat::Json;

    // A single manifest in human mode surfaces its own error and exit code.
    if !json && !args.input.is_dir() {
        let device = load_device(&args.input, &config, true)?;
        output.success(&format!(
            "{}: valid ({} blocks, {})",
            args.input.display(),
            device.block_names().len(),
            device.platform().unwrap_or("no platform"),
        ))?;
        return Ok(());
    }

    let mut reports = Vec::with_capacity(manifests.len());
    for path in manifests {
        let report = match load_device(&path, &config, true) {
            Ok(device) => CheckReport {
                valid: true,
                platform: device.platform(),
                blocks: device.block_names().iter().map(|b| b.to_string()).collect(),
                error: None,
                path,
            },
            Err(e) => {
                e.log();
                CheckReport {
                    valid: false,
                    platform: None,
                    blocks: Vec::new(),
                    error: Some(e.to_string()),
                    path,
                }
            }
        };

        if !json {
            match &report.error {
                None => output.success(&format!(
                    "{}: valid ({} blocks)",
                    report.path.display(),
                    report.blocks.len()
                ))?,
                Some(error) => output.error(&format!("{}: {error}", report.path.display()))?,
            }
        }
        reports.push(report);
    }

    if json {
        let text = serde_json::to_string_pretty(&reports).with_cli_context(|| "encoding report")?;
        output.document(&format!("{text}\n"))?;
    }

    let failed = reports.iter().filter(|r| !r.valid).count();
    if failed > 0 {
        return Err(CliError::BatchFailed {
            failed,
            total: reports.len(),
        });
    }
    Ok(())
}
