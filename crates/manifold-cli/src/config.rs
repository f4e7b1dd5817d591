//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns it; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `MANIFOLD_SECTION__KEY`
//! 3. Config file (`--config`, else the platform config dir)
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Prefix of environment overrides, e.g. `MANIFOLD_DEFAULTS__SITES=spilnu,lyckost`.
pub const ENV_PREFIX: &str = "MANIFOLD";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default values for new projects.
    pub defaults: Defaults,
    /// Output settings.
    pub output: OutputConfig,
    /// Fragment override settings.
    pub fragments: FragmentConfig,
    /// Update catalog settings.
    pub updates: UpdateConfig,
}

/// Answers `manifold new` starts from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub service_type: String,
    pub sites: Vec<String>,
    pub uses_cron: bool,
    pub uses_cloudflared: bool,
    pub needs_local_database: bool,
    pub needs_local_redis: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FragmentConfig {
    /// Directory whose files shadow the built-in fragments.
    pub local_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// Update catalog directory.
    pub path: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            service_type: "api".into(),
            sites: vec!["spilnu".into()],
            uses_cron: false,
            uses_cloudflared: false,
            needs_local_database: false,
            needs_local_redis: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration, layering file and environment over defaults.
    ///
    /// A file passed via `--config` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        debug!(path = %path.display(), required, "Loading configuration");
        Self::load_from(&path, required)
    }

    fn load_from(path: &Path, required: bool) -> anyhow::Result<Self> {
        let loaded = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::from(path).format(FileFormat::Toml).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("defaults.sites"),
            )
            .build()?
            .try_deserialize()?;
        Ok(loaded)
    }

    /// Path to the default configuration file.
    ///
    /// Falls back to `.manifold.toml` in the current directory when the
    /// platform has no config dir.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dk", "cego", "manifold")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".manifold.toml"))
    }

    /// Path used by `manifold init --local`.
    pub fn local_config_path() -> PathBuf {
        PathBuf::from(".manifold.toml")
    }
}
