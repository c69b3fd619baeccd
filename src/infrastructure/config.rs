//! Configuration management for the ticker
//!
//! Loads configuration from config.toml at startup.
//! Every field has a default, so a missing file or section is fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::NumberLocale;

/// Ticker configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Refresh settings
    #[serde(default)]
    pub ticker: TickerConfig,

    /// Fragment output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log files
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Refresh cycle configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TickerConfig {
    /// Site serving `/api/markets/ticker/`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Seconds between refreshes
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Placeholder when the container has no `data-loading` attribute
    #[serde(default = "default_loading_label")]
    pub loading_label: String,

    /// Number locale when the document has no language
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Marquee duration policy
    #[serde(default)]
    pub duration: DurationPolicy,
}

/// How the marquee animation duration is chosen
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum DurationPolicy {
    /// Constant duration
    Fixed {
        #[serde(default = "default_duration_secs")]
        seconds: u64,
    },
    /// `clamp(round(text_len / chars_per_second), min_secs, max_secs)`
    Proportional {
        #[serde(default = "default_chars_per_second")]
        chars_per_second: f64,
        #[serde(default = "default_min_duration_secs")]
        min_secs: u64,
        #[serde(default = "default_max_duration_secs")]
        max_secs: u64,
    },
}

impl Default for DurationPolicy {
    fn default() -> Self {
        Self::Fixed {
            seconds: default_duration_secs(),
        }
    }
}

impl DurationPolicy {
    /// Animation duration for a row whose plain text has `text_len` chars
    pub fn duration_for(&self, text_len: usize) -> Duration {
        match *self {
            Self::Fixed { seconds } => Duration::from_secs(seconds),
            Self::Proportional {
                chars_per_second,
                min_secs,
                max_secs,
            } => {
                let raw = if chars_per_second > 0.0 {
                    (text_len as f64 / chars_per_second).round() as u64
                } else {
                    max_secs
                };
                Duration::from_secs(raw.max(min_secs).min(max_secs.max(min_secs)))
            }
        }
    }
}

/// Fragment output configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Where the ticker fragment is written
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// Document language attribute
    #[serde(default)]
    pub lang: Option<String>,

    /// Container `data-loading` attribute
    #[serde(default)]
    pub loading_attr: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,

    /// Default filter directive, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            interval_secs: default_interval_secs(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            loading_label: default_loading_label(),
            locale: default_locale(),
            duration: DurationPolicy::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            lang: None,
            loading_attr: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            level: default_log_level(),
        }
    }
}

impl TickerConfig {
    #[inline]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Configured default number locale
    pub fn number_locale(&self) -> NumberLocale {
        NumberLocale::from_tag(&self.locale)
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_interval_secs() -> u64 {
    300 // 5 minutes
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("uz-ticker/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_loading_label() -> String {
    "Loading…".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_duration_secs() -> u64 {
    45
}

fn default_chars_per_second() -> f64 {
    6.0
}

fn default_min_duration_secs() -> u64 {
    25
}

fn default_max_duration_secs() -> u64 {
    70
}

fn default_output_path() -> PathBuf {
    PathBuf::from("ticker.html")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from `path`, else CONFIG_PATH, else config.toml
    ///
    /// If the file doesn't exist, returns default configuration.
    /// # Errors
    /// Returns error if file exists but cannot be parsed, or if the
    /// interval is zero.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => PathBuf::from(
                std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string()),
            ),
        };

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // File not found - use defaults
                Ok(Config::default())
            }
            Err(e) => Err(ConfigError::IoError(e)),
        }
    }

    /// Parse and validate TOML text
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.ticker.interval_secs == 0 {
            return Err(ConfigError::Invalid("ticker.interval_secs must be > 0".to_string()));
        }
        if self.ticker.timeout_secs == 0 {
            return Err(ConfigError::Invalid("ticker.timeout_secs must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading file
    IoError(std::io::Error),
    /// Parse error (invalid TOML)
    ParseError(String),
    /// Parsed but out of range
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::ParseError(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Invalid(e) => write!(f, "Invalid config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError(e) => Some(e),
            ConfigError::ParseError(_) | ConfigError::Invalid(_) => None,
        }
    }
}
