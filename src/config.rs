//! Configuration management for Porssi
//!
//! This module handles loading, validation, and management of the application
//! configuration from YAML files.

use crate::error::{PorssiError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

mod defaults;

/// Default file locations probed by [`Config::load`]
pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["porssi_config.yaml", "/etc/porssi/config.yaml"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(schemars::JsonSchema))]
#[serde(default)]
pub struct Config {
    /// Price API connection settings
    pub api: ApiConfig,

    /// Timezone and price band settings
    pub display: DisplayConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Web server binding configuration
    pub web: WebConfig,

    /// Minutes between two full refreshes in `serve` mode
    pub refresh_interval_minutes: u64,
}

/// Price API connection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(schemars::JsonSchema))]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL; `/v1/price.json` is appended
    pub base_url: String,

    /// Per-request timeout in seconds
    pub request_timeout_seconds: u64,

    /// User-Agent header sent with each request
    pub user_agent: String,
}

/// Presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(schemars::JsonSchema))]
#[serde(default)]
pub struct DisplayConfig {
    /// IANA timezone used to decide "today" and the current hour
    pub timezone: String,

    /// Prices at or below this are CHEAP (c/kWh)
    pub cheap_threshold: f64,

    /// Prices at or above this are EXPENSIVE (c/kWh)
    pub expensive_threshold: f64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(schemars::JsonSchema))]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Optional override for the console layer
    pub console_level: Option<String>,

    /// Optional override for the file layer
    pub file_level: Option<String>,

    /// Path to log file
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

/// Web server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(schemars::JsonSchema))]
#[serde(default)]
pub struct WebConfig {
    /// Bind address
    pub host: String,

    /// TCP port
    pub port: u16,
}

impl DisplayConfig {
    /// Parse the configured timezone
    pub fn tz(&self) -> Result<chrono_tz::Tz> {
        self.timezone.parse::<chrono_tz::Tz>().map_err(|_| {
            PorssiError::validation(
                "display.timezone",
                format!("Unknown timezone '{}'", self.timezone),
            )
        })
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the first default location that exists
    pub fn load() -> Result<Self> {
        for path in &DEFAULT_CONFIG_PATHS {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        Ok(Self::default())
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(PorssiError::validation(
                "api.base_url",
                "Base URL cannot be empty",
            ));
        }

        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"))
        {
            return Err(PorssiError::validation(
                "api.base_url",
                "Base URL must start with http:// or https://",
            ));
        }

        if self.api.request_timeout_seconds == 0 {
            return Err(PorssiError::validation(
                "api.request_timeout_seconds",
                "Must be greater than 0",
            ));
        }

        self.display.tz()?;

        if self.display.cheap_threshold > self.display.expensive_threshold {
            return Err(PorssiError::validation(
                "display.cheap_threshold",
                "Must not exceed display.expensive_threshold",
            ));
        }

        if self.refresh_interval_minutes == 0 {
            return Err(PorssiError::validation(
                "refresh_interval_minutes",
                "Must be greater than 0",
            ));
        }

        if self.web.port == 0 {
            return Err(PorssiError::validation(
                "web.port",
                "Port must be greater than 0",
            ));
        }

        Ok(())
    }
}
