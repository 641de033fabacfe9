//! Configuration management for launchboard.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::views::ALL_SITES;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "launchboard";

/// Public launch dataset used when no other source is configured.
pub const DEFAULT_DATASET_URL: &str = "https://cf-courses-data.s3.us.cloud-object-storage.appdomain.cloud/IBM-DS0321EN-SkillsNetwork/datasets/spacex_launch_dash.csv";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `LAUNCHBOARD_`, sections split by `__`)
/// 2. TOML config file at `~/.config/launchboard/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dataset source configuration.
    pub dataset: DatasetConfig,
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Dashboard controls configuration.
    pub dashboard: DashboardConfig,
}

/// Where the launch table comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// URL of the CSV dataset.
    pub url: String,
    /// Local CSV file. Takes precedence over `url` when set.
    pub path: Option<PathBuf>,
    /// Timeout for the dataset fetch in seconds.
    pub timeout_secs: u64,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to listen on.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Development mode: debug-level logging.
    pub debug: bool,
}

/// Dashboard layout and control configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Page heading.
    pub title: String,
    /// Launch sites offered in the site dropdown, after "All Sites".
    pub sites: Vec<String>,
    /// Lower end of the payload slider scale in kg.
    pub payload_min: f64,
    /// Upper end of the payload slider scale in kg.
    pub payload_max: f64,
    /// Payload slider step in kg.
    pub payload_step: f64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATASET_URL.to_string(),
            path: None,
            timeout_secs: 30,
        }
    }
}

impl DatasetConfig {
    /// Get the dataset fetch timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8050,
            debug: true,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "SpaceX Falcon9 Launch Dashboard".to_string(),
            sites: default_sites(),
            payload_min: 0.0,
            payload_max: 10_000.0,
            payload_step: 1_000.0,
        }
    }
}

/// Launch sites present in the public dataset.
fn default_sites() -> Vec<String> {
    vec![
        "CCAFS LC-40".to_string(),
        "VAFB SLC-4E".to_string(),
        "KSC LC-39A".to_string(),
        "CCAFS SLC-40".to_string(),
    ]
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `LAUNCHBOARD_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("LAUNCHBOARD_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate the configuration file at `path`.
    ///
    /// Unlike [`Config::load_from`], a missing file is an error rather than a
    /// fallback to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, cannot be parsed, or holds
    /// invalid values.
    pub fn check_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::config_validation(format!(
                "configuration file {} does not exist",
                path.display()
            )));
        }
        Self::load_from(Some(path.to_path_buf()))
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.dataset.timeout_secs == 0 {
            return Err(Error::config_validation(
                "dataset timeout_secs must be greater than 0",
            ));
        }

        if self.dataset.path.is_none() && self.dataset.url.trim().is_empty() {
            return Err(Error::config_validation(
                "either dataset url or dataset path must be set",
            ));
        }

        let board = &self.dashboard;
        if board.payload_min >= board.payload_max {
            return Err(Error::config_validation(format!(
                "payload_min ({}) must be less than payload_max ({})",
                board.payload_min, board.payload_max
            )));
        }

        if board.payload_step <= 0.0 {
            return Err(Error::config_validation(
                "payload_step must be greater than 0",
            ));
        }

        if board.payload_step > board.payload_max - board.payload_min {
            return Err(Error::config_validation(format!(
                "payload_step ({}) is wider than the slider scale",
                board.payload_step
            )));
        }

        if board.sites.is_empty() {
            return Err(Error::config_validation(
                "at least one launch site must be configured",
            ));
        }

        if let Some(site) = board.sites.iter().find(|site| site.as_str() == ALL_SITES) {
            return Err(Error::config_validation(format!(
                "site name '{site}' is reserved for the all-sites selection"
            )));
        }

        Ok(())
    }

    /// Get the `host:port` listen address.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
