//! Command handlers, one module per subcommand.

use std::path::{Path, PathBuf};

use tracing::instrument;

use devyaml_blocks::{DeviceConfig, discover_manifests, load_manifest};

use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

pub mod blocks;
pub mod check;
pub mod completions;
pub mod config;
pub mod init;
pub mod render;

/// Manifests named by `input`: the file itself, or every `*.toml` below a
/// directory in path order.
///
/// # Errors
///
/// - [`CliError::InputNotFound`] if `input` does not exist
/// - [`CliError::NoManifests`] if a directory holds no manifests
pub(crate) fn collect_inputs(input: &Path) -> CliResult<Vec<PathBuf>> {
    if !input.exists() {
        return Err(CliError::InputNotFound {
            path: input.to_path_buf(),
        });
    }
    if !input.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }

    let manifests = discover_manifests(input)?;
    if manifests.is_empty() {
        return Err(CliError::NoManifests {
            path: input.to_path_buf(),
        });
    }
    Ok(manifests)
}

/// Read one manifest with the configured defaults, validating if asked.
#[instrument(skip(config), fields(path = %path.display()))]
pub(crate) fn load_device(path: &Path, config: &AppConfig, validate: bool) -> CliResult<DeviceConfig> {
    let device = load_manifest(path, &config.defaults)?;
    if validate {
        device.validate()?;
    }
    Ok(device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_input_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = collect_inputs(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, CliError::InputNotFound { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn a_file_is_its_own_input() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("porch.toml");
        fs::write(&path, "").unwrap();
        assert_eq!(collect_inputs(&path).unwrap(), vec![path]);
    }

    #[test]
    fn empty_directory_has_no_manifests() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("README.md"), "").unwrap();
        assert!(matches!(
            collect_inputs(dir.path()),
            Err(CliError::NoManifests { .. })
        ));
    }

    #[test]
    fn load_device_applies_config_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("node.toml");
        fs::write(&path, "[esphome]\nname = \"node\"\n").unwrap();

        let bare = AppConfig::default();
        assert!(load_device(&path, &bare, true).is_err());
        assert!(load_device(&path, &bare, false).is_ok());

        let mut config = AppConfig::default();
        config.defaults.platform = Some("esp32".into());
        config.defaults.board = Some("esp32dev".into());
        let device = load_device(&path, &config, true).unwrap();
        assert_eq!(device.platform(), Some("esp32"));
    }
}
