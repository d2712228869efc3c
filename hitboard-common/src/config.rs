//! Bootstrap configuration loading
//!
//! Configuration is read once at startup and never changes while running.
//!
//! # Config File Resolution Priority
//!
//! 1. Command-line argument (`--config`, highest priority)
//! 2. Environment variable (`HITBOARD_CONFIG`)
//! 3. Per-user config file (`~/.config/hitboard/config.toml` on Linux)
//! 4. Built-in defaults (fallback)
//!
//! A missing config file is never fatal: a warning is logged and defaults are used.
//! A config file that exists but does not parse is a fatal `Error::Config`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "HITBOARD_CONFIG";

/// Environment variable naming the dataset CSV
pub const DATASET_ENV_VAR: &str = "HITBOARD_DATASET";

/// Character encoding of the raw catalog file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SourceEncoding {
    /// Strict UTF-8; invalid byte sequences are fatal
    #[default]
    #[serde(rename = "utf-8", alias = "utf8", alias = "UTF-8")]
    Utf8,
    /// ISO-8859-15 (Latin-9); every byte maps to a character
    #[serde(rename = "iso-8859-15", alias = "latin9", alias = "ISO-8859-15")]
    Latin9,
}

/// Bootstrap configuration loaded from TOML file
///
/// Every field has a built-in default, so an empty file is a valid config.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Path to the catalog CSV (optional, may come from CLI or environment instead)
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,

    /// Character encoding of the catalog CSV
    #[serde(default)]
    pub encoding: SourceEncoding,

    /// Number of top items (by streams) kept as the ranking universe
    #[serde(default = "default_universe_size")]
    pub universe_size: usize,

    /// Initial top-N window
    #[serde(default = "default_window")]
    pub default_window: usize,

    /// Initial x-axis metric column for the correlation view
    #[serde(default = "default_x_axis")]
    pub default_x_axis: String,

    /// Initial y-axis metric column for the correlation view
    #[serde(default = "default_y_axis")]
    pub default_y_axis: String,

    /// HTTP bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    ///
    /// Default: 5780
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_universe_size() -> usize {
    100
}

fn default_window() -> usize {
    10
}

fn default_x_axis() -> String {
    "danceability_%".to_string()
}

fn default_y_axis() -> String {
    "energy_%".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5780
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            encoding: SourceEncoding::default(),
            universe_size: default_universe_size(),
            default_window: default_window(),
            default_x_axis: default_x_axis(),
            default_y_axis: default_y_axis(),
            host: default_host(),
            port: default_port(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }
}

/// Resolves which config file to read and loads it
///
/// # Examples
///
/// ```
/// use hitboard_common::config::ConfigResolver;
///
/// let resolver = ConfigResolver::new(None);
/// let _path = resolver.resolve_path();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    cli_arg: Option<PathBuf>,
}

impl ConfigResolver {
    /// Create a resolver; `cli_arg` is the `--config` value if one was given
    pub fn new(cli_arg: Option<PathBuf>) -> Self {
        Self { cli_arg }
    }

    /// Config file path following the priority order, if any source names one
    pub fn resolve_path(&self) -> Option<PathBuf> {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_arg {
            return Some(path.clone());
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        // Priority 3: Per-user config file, only when it exists
        default_config_path().filter(|p| p.exists())
    }

    /// Load the resolved config, falling back to defaults when no file is found
    pub fn load(&self) -> Result<TomlConfig> {
        match self.resolve_path() {
            Some(path) if path.exists() => {
                info!("Loading config from {}", path.display());
                TomlConfig::load(&path)
            }
            Some(path) => {
                warn!("Config file {} not found, using defaults", path.display());
                Ok(TomlConfig::default())
            }
            None => {
                info!("No config file found, using defaults");
                Ok(TomlConfig::default())
            }
        }
    }
}

/// Per-user default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("hitboard").join("config.toml"))
}

/// Dataset path resolution: CLI argument > environment variable > TOML `dataset_path`
pub fn resolve_dataset_path(cli_arg: Option<&Path>, config: &TomlConfig) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(DATASET_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    config.dataset_path.clone()
}
