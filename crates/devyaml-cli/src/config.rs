//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI owns config; the library crates only ever see the
//! [`ManifestDefaults`] slice of it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `DEVYAML_*` environment variables, `__` between sections
//!    (`DEVYAML_DEFAULTS__PLATFORM=esp32`)
//! 3. The file passed with `--config` (must exist)
//! 4. `.devyaml.toml` in the current directory (optional)
//! 5. The per-user config file (optional)
//! 6. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use devyaml_blocks::ManifestDefaults;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Name of the per-project config file.
pub const LOCAL_CONFIG_FILE: &str = ".devyaml.toml";

const ENV_PREFIX: &str = "DEVYAML";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Fallbacks for manifests that leave the platform out.
    pub defaults: ManifestDefaults,
    /// Output settings.
    pub output: OutputConfig,
    /// Render settings.
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`.
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Extension of YAML files written into an output directory.
    pub extension: String,
    /// Validate devices before rendering.
    pub validate: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            extension: "yaml".into(),
            validate: true,
        }
    }
}

impl AppConfig {
    /// Load configuration by layering every source over the defaults.
    ///
    /// `config_file` is the path passed via `--config`; unlike the implicit
    /// locations it is an error for it to be missing.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path(), Path::new(LOCAL_CONFIG_FILE), config_file)
    }

    fn load_from(
        user_file: &Path,
        local_file: &Path,
        config_file: Option<&PathBuf>,
    ) -> anyhow::Result<Self> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&Self::default()).context("invalid built-in defaults")?)
            .add_source(toml_file(user_file).required(false))
            .add_source(toml_file(local_file).required(false));

        if let Some(path) = config_file {
            builder = builder.add_source(toml_file(path).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("could not read configuration")?
            .try_deserialize::<Self>()
            .context("invalid configuration")?;

        debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Path to the per-user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.devyaml.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "devyaml", "devyaml")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// The file that wins for this invocation: `--config`, then a local
    /// `.devyaml.toml`, then the per-user file.
    pub fn active_path(config_file: Option<&PathBuf>) -> PathBuf {
        if let Some(path) = config_file {
            return path.clone();
        }
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() { local } else { Self::config_path() }
    }

    /// Serialise as the TOML written by `init` and printed by `config list`.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

fn toml_file(path: &Path) -> File<config::FileSourceFile, FileFormat> {
    File::from(path).format(FileFormat::Toml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn load_in(dir: &TempDir, explicit: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
        AppConfig::load_from(
            &dir.path().join("user.toml"),
            &dir.path().join(LOCAL_CONFIG_FILE),
            explicit,
        )
    }

    #[test]
    fn defaults_have_no_platform() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.defaults.platform, None);
        assert_eq!(cfg.render.extension, "yaml");
        assert!(cfg.render.validate);
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn load_without_files_returns_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load_in(&dir, None).unwrap(), AppConfig::default());
    }

    #[test]
    fn local_file_overrides_user_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("user.toml"),
            "[defaults]\nplatform = \"esp8266\"\nboard = \"d1_mini\"\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(LOCAL_CONFIG_FILE),
            "[defaults]\nplatform = \"esp32\"\n",
        )
        .unwrap();

        let cfg = load_in(&dir, None).unwrap();
        assert_eq!(cfg.defaults.platform.as_deref(), Some("esp32"));
        assert_eq!(cfg.defaults.board.as_deref(), Some("d1_mini"));
    }

    #[test]
    fn explicit_file_is_layered_last() {
        let dir = TempDir::new().unwrap();
        let explicit = dir.path().join("ci.toml");
        fs::write(&explicit, "[render]\nextension = \"yml\"\nvalidate = false\n").unwrap();

        let cfg = load_in(&dir, Some(&explicit)).unwrap();
        assert_eq!(cfg.render.extension, "yml");
        assert!(!cfg.render.validate);
        assert_eq!(cfg.output.format, "auto");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(load_in(&dir, Some(&missing)).is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(LOCAL_CONFIG_FILE), "[render\n").unwrap();
        assert!(load_in(&dir, None).is_err());
    }

    #[test]
    fn written_config_loads_back() {
        let dir = TempDir::new().unwrap();
        let mut cfg = AppConfig::default();
        cfg.defaults.platform = Some("esp32".into());
        fs::write(dir.path().join(LOCAL_CONFIG_FILE), cfg.to_toml().unwrap()).unwrap();

        assert_eq!(load_in(&dir, None).unwrap(), cfg);
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }

    #[test]
    fn explicit_path_is_active() {
        let explicit = PathBuf::from("/etc/devyaml.toml");
        assert_eq!(AppConfig::active_path(Some(&explicit)), explicit);
    }
}
