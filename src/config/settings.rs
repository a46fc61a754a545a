use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::constants::{API_URL_ENV, CONFIG_FILE, DEFAULT_API_URL};
use crate::error::{TeammateError, TeammateResult};

/// What the request board does with its local collection after a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReconcileStrategy {
    /// Apply the record returned by the server to the local collection.
    #[default]
    TrustResponse,
    /// Re-list the whole collection from the server.
    Refetch,
}

impl fmt::Display for ReconcileStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileStrategy::TrustResponse => write!(f, "trust-response"),
            ReconcileStrategy::Refetch => write!(f, "refetch"),
        }
    }
}

impl FromStr for ReconcileStrategy {
    type Err = TeammateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trust-response" | "trust" => Ok(ReconcileStrategy::TrustResponse),
            "refetch" => Ok(ReconcileStrategy::Refetch),
            other => Err(TeammateError::InvalidInput(format!(
                "Unknown reconcile strategy '{}'. Use trust-response or refetch",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_url: Option<String>,
    #[serde(default)]
    pub reconcile: ReconcileStrategy,
    pub default_format: Option<String>,
}

impl Config {
    /// Base url of the backend, without a trailing slash.
    pub fn api_url(&self) -> String {
        self.api_url
            .as_deref()
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string()
    }
}

pub fn config_path() -> TeammateResult<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| TeammateError::ConfigError("Could not find home directory".to_string()))?;
    Ok(home_dir.join(CONFIG_FILE))
}

pub fn load_config() -> Config {
    match config_path() {
        Ok(path) => load_config_from(&path).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

/// Read a config file; a missing file yields the defaults.
pub fn load_config_from(path: &Path) -> TeammateResult<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let config_str = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&config_str)?)
}

pub fn save_config(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let path = config_path()?;
    save_config_to(config, &path)?;
    Ok(())
}

pub fn save_config_to(config: &Config, path: &Path) -> TeammateResult<()> {
    let config_str = serde_json::to_string_pretty(config)?;
    fs::write(path, config_str)?;
    Ok(())
}

/// The backend base url: environment first, then the config file, then the default.
pub fn get_api_url(config: &Config) -> String {
    if let Ok(url) = env::var(API_URL_ENV) {
        if !url.trim().is_empty() {
            return url.trim().trim_end_matches('/').to_string();
        }
    }

    config.api_url()
}
