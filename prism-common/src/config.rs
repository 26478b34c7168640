//! Configuration loading and corpus folder resolution
//!
//! Configuration is a small optional TOML bootstrap file. Everything in it has a
//! compiled default, so a missing file is never fatal.
//!
//! # Settings Sources Priority
//!
//! 1. Command-line arguments (`--corpus-dir`, `--config`)
//! 2. Environment variables (`PRISM_CORPUS_DIR`, `PRISM_CONFIG`)
//! 3. TOML configuration file
//! 4. Compiled defaults

use crate::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable overriding the corpus directory
pub const CORPUS_DIR_ENV: &str = "PRISM_CORPUS_DIR";

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "PRISM_CONFIG";

/// Corpus directory used when nothing else is configured
pub const DEFAULT_CORPUS_DIR: &str = "profiles";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Directory holding one JSON document per profile
    #[serde(default)]
    pub corpus_dir: Option<PathBuf>,

    /// Aggregate array file, relative to the corpus directory unless absolute
    #[serde(default)]
    pub aggregate_file: Option<PathBuf>,

    /// Outline CSV used for coverage reconciliation
    #[serde(default)]
    pub outline_file: Option<PathBuf>,

    /// Where report snapshots are written when no explicit output is given
    #[serde(default)]
    pub report_dir: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub inference: InferenceOverrides,

    /// Extra synonym entries merged over the standard table
    #[serde(default)]
    pub synonyms: BTreeMap<String, String>,
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

/// Per-field default overrides, keyed by target field path
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InferenceOverrides {
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse configuration text
    pub fn parse(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`; `None` when the file does not exist
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_optional(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map(Some)
    }

    /// Settle the result of [`TomlConfig::load_optional`], falling back to
    /// compiled defaults when no file was found
    ///
    /// Call once logging is initialized so the outcome is reported.
    pub fn or_default(loaded: Option<Self>, path: Option<&Path>) -> Self {
        match loaded {
            Some(config) => {
                if let Some(path) = path {
                    info!("Config: {}", path.display());
                }
                config
            }
            None => {
                warn!("No config file found, using compiled defaults");
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(Error::Config(format!(
                "unknown log level '{}'",
                self.logging.level
            )));
        }
        Ok(())
    }

    /// Aggregate file location, anchored at `corpus_dir` when relative
    pub fn aggregate_path(&self, corpus_dir: &Path) -> Option<PathBuf> {
        self.aggregate_file
            .as_ref()
            .map(|file| anchor(corpus_dir, file))
    }

    /// `file_name` inside the configured report directory, if any
    pub fn report_path(&self, file_name: &str) -> Option<PathBuf> {
        self.report_dir.as_ref().map(|dir| dir.join(file_name))
    }
}

fn anchor(base: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        base.join(file)
    }
}

/// Config file location
///
/// 1. `--config` argument
/// 2. `PRISM_CONFIG`
/// 3. `<config_dir>/prism/config.toml`
///
/// Returns `None` only when no argument or variable is set and the platform has
/// no config directory.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Some(path) = non_empty_env(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }

    dirs::config_dir().map(|dir| dir.join("prism").join("config.toml"))
}

/// Corpus directory
///
/// 1. `--corpus-dir` argument
/// 2. `PRISM_CORPUS_DIR`
/// 3. TOML `corpus_dir`
/// 4. `./profiles`
pub fn resolve_corpus_dir(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Some(path) = non_empty_env(CORPUS_DIR_ENV) {
        return PathBuf::from(path);
    }

    if let Some(path) = &config.corpus_dir {
        return path.clone();
    }

    PathBuf::from(DEFAULT_CORPUS_DIR)
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
