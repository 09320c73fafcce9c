//! Application configuration.
//!
//! Settings load from a YAML file (`--config` or
//! `<platform config dir>/topic_scout/config.yaml`). A missing file means
//! defaults; a file that exists but fails to parse or validate is an error.
//! The API key can come from the command line, the `PERPLEXITY_API_KEY`
//! environment variable (both handled by the CLI layer), or the config file,
//! in that order.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ScoutError};

pub const DEFAULT_API_BASE: &str = "https://api.perplexity.ai";
pub const DEFAULT_MODEL: &str = "sonar-pro";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Settings for the completion endpoint and local storage.
///
/// Every field is optional in the file; omitted fields take the defaults
/// below.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// API root; `/chat/completions` is appended per request.
    pub api_base: String,
    /// Model name sent with every request.
    pub model: String,
    /// Sampling temperature sent with every request.
    pub temperature: f64,
    /// API key, lowest-priority source after the CLI flag and environment.
    pub api_key: Option<String>,
    /// Where history files live; defaults to the platform data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            api_key: None,
            data_dir: None,
        }
    }
}

impl Config {
    /// Load the config from `path`, or from the default location when `path`
    /// is `None`. A file that doesn't exist yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => return Ok(Config::default()),
            },
        };
        if !path.exists() {
            debug!(path = %path.display(), "No config file; using defaults");
            return Ok(Config::default());
        }

        let raw = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&raw)?;
        config.validate()?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Check field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.api_base.trim().is_empty() {
            return Err(ScoutError::InvalidConfig {
                field: "api_base",
                reason: "must not be empty".to_string(),
            });
        }
        if self.model.trim().is_empty() {
            return Err(ScoutError::InvalidConfig {
                field: "model",
                reason: "must not be empty".to_string(),
            });
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ScoutError::InvalidConfig {
                field: "temperature",
                reason: format!("{} is outside 0.0..=2.0", self.temperature),
            });
        }
        Ok(())
    }

    /// Resolve the API key: CLI/environment first, then the config file.
    pub fn resolve_api_key(&self, cli_key: Option<String>) -> Result<String> {
        cli_key
            .or_else(|| self.api_key.clone())
            .ok_or(ScoutError::MissingApiKey)
    }

    /// Resolve the directory history files live in.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|d| d.join("topic_scout"))
            .ok_or(ScoutError::NoDataDir)
    }
}

/// The default config file location for this platform, if any.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("topic_scout").join("config.yaml"))
}
