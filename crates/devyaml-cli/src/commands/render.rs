//! `devyaml render`: turn manifests into device files.
//!
//! ```text
//! porch.toml ──────────────▶ stdout            (no -o / --out-dir)
//! porch.toml ── -o FILE ───▶ FILE
//! devices/   ── --out-dir ─▶ DIR/<relative path>.yaml
//! devices/   ──────────────▶ next to each manifest
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use devyaml_blocks::DeviceConfig;

use crate::{
    cli::{EmitFormat, RenderArgs},
    commands::{collect_inputs, load_device},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(input = %args.input.display(), emit = ?args.emit))]
pub fn execute(args: RenderArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let manifests = collect_inputs(&args.input)?;
    let validate = config.render.validate && !args.no_validate;

    if !args.input.is_dir() {
        return render_file(&args, &config, validate, &output);
    }

    if args.output.is_some() {
        return Err(CliError::invalid_input(
            "--output takes a single manifest; use --out-dir for a directory",
        ));
    }

    let extension = extension(args.emit, &config);
    let mut failed = 0;
    for manifest in &manifests {
        let target = batch_target(&args.input, manifest, args.out_dir.as_deref(), extension);
        let result = load_device(manifest, &config, validate)
            .and_then(|device| emit(&device, args.emit))
            .and_then(|text| write_output(&target, &text, args.force));

        match result {
            Ok(()) => output.success(&format!(
                "{} \u{2192} {}",
                manifest.display(),
                target.display()
            ))?,
            Err(e) => {
                failed += 1;
                e.log();
                output.error(&format!("{}: {e}", manifest.display()))?;
            }
        }
    }

    if failed > 0 {
        return Err(CliError::BatchFailed {
            failed,
            total: manifests.len(),
        });
    }
    info!(count = manifests.len(), "manifests rendered");
    output.info(&format!("Rendered {} manifest(s)", manifests.len()))?;
    Ok(())
}

fn render_file(
    args: &RenderArgs,
    config: &AppConfig,
    validate: bool,
    output: &OutputManager,
) -> CliResult<()> {
    let device = load_device(&args.input, config, validate)?;
    let text = emit(&device, args.emit)?;

    let target = match (&args.output, &args.out_dir) {
        (Some(file), _) => file.clone(),
        (None, Some(dir)) => dir.join(file_name(&args.input, extension(args.emit, config))),
        (None, None) => {
            output.document(&text)?;
            return Ok(());
        }
    };

    write_output(&target, &text, args.force)?;
    output.success(&format!(
        "Rendered {} \u{2192} {}",
        args.input.display(),
        target.display()
    ))?;
    Ok(())
}

/// The document text for one device.
fn emit(device: &DeviceConfig, format: EmitFormat) -> CliResult<String> {
    match format {
        EmitFormat::Yaml => Ok(device.render()),
        EmitFormat::Json => serde_json::to_string_pretty(&device.to_node())
            .map(|json| json + "\n")
            .with_cli_context(|| "encoding device as JSON"),
    }
}

fn extension(format: EmitFormat, config: &AppConfig) -> &str {
    match format {
        EmitFormat::Yaml => &config.render.extension,
        EmitFormat::Json => "json",
    }
}

fn file_name(manifest: &Path, extension: &str) -> PathBuf {
    Path::new(manifest.file_name().unwrap_or(manifest.as_os_str())).with_extension(extension)
}

/// Where a manifest found under `root` is written: mirrored below
/// `out_dir`, or beside the manifest.
fn batch_target(root: &Path, manifest: &Path, out_dir: Option<&Path>, extension: &str) -> PathBuf {
    match out_dir {
        Some(dir) => dir
            .join(manifest.strip_prefix(root).unwrap_or(manifest))
            .with_extension(extension),
        None => manifest.with_extension(extension),
    }
}

fn write_output(path: &Path, text: &str, force: bool) -> CliResult<()> {
    if path.exists() && !force {
        return Err(CliError::OutputExists {
            path: path.to_path_buf(),
        });
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_cli_context(|| format!("Failed to create directory '{}'", parent.display()))?;
    }
    fs::write(path, text).with_cli_context(|| format!("Failed to write '{}'", path.display()))?;
    debug!(path = %path.display(), bytes = text.len(), "output written");
    Ok(())
}
