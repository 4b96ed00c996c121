//! `devyaml config`: inspect configuration values.

use std::path::PathBuf;

use serde_json::Value;

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    config_file: Option<&PathBuf>,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.document(&format!("{value}\n"))?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            let serialised = config.to_toml().map_err(|e| CliError::ConfigError {
                message: format!("Failed to serialise config: {e}"),
                source: Some(Box::new(e)),
            })?;
            output.document(&serialised)?;
        }

        ConfigCommands::Path => {
            output.document(&format!(
                "{}\n",
                AppConfig::active_path(config_file).display()
            ))?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

/// Look up a dotted key such as `defaults.platform`. Unset values print as
/// an empty string.
fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let unknown = || CliError::UnknownConfigKey { key: key.into() };

    let tree = serde_json::to_value(config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })?;

    let value = key
        .split('.')
        .try_fold(&tree, |node, segment| node.get(segment))
        .ok_or_else(unknown)?;

    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Bool(_) | Value::Number(_) => Ok(value.to_string()),
        Value::Array(_) | Value::Object(_) => Err(unknown()),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_known_keys() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "render.extension").unwrap(), "yaml");
        assert_eq!(get_config_value(&cfg, "render.validate").unwrap(), "true");
        assert_eq!(get_config_value(&cfg, "output.no_color").unwrap(), "false");
    }

    #[test]
    fn unset_values_are_empty() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "defaults.platform").unwrap(), "");
    }

    #[test]
    fn configured_values_are_returned() {
        let mut cfg = AppConfig::default();
        cfg.defaults.board = Some("d1_mini".into());
        assert_eq!(get_config_value(&cfg, "defaults.board").unwrap(), "d1_mini");
    }

    #[test]
    fn unknown_or_section_keys_are_errors() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::UnknownConfigKey { .. })
        ));
        assert!(matches!(
            get_config_value(&cfg, "defaults"),
            Err(CliError::UnknownConfigKey { .. })
        ));
    }
}
