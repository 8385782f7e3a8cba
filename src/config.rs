//! Configuration management for snowline
//!
//! Handles loading configuration from a TOML file and environment variables
//! and validates every setting before a build starts.

use crate::SnowError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SnowlineConfig {
    /// Forecast provider settings
    #[serde(default)]
    pub forecast: ForecastConfig,
    /// Aggregation settings
    #[serde(default)]
    pub region: RegionConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Forecast provider (Open-Meteo) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Base URL of the provider, without the `/v1/forecast` path
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API key for the commercial endpoint
    pub api_key: Option<String>,
    /// IANA timezone all dates are reported in
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Days of forecast to request (provider maximum is 16)
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Retries after the first failed attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Upper bound of the randomised sleep between attempts
    #[serde(default = "default_max_backoff")]
    pub max_backoff_seconds: u32,
}

/// Regional aggregation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Countries with at most this many resorts skip the region level
    #[serde(default = "default_small_country_threshold")]
    pub small_country_threshold: usize,
    /// Default length of top-N leaderboards
    #[serde(default = "default_top_limit")]
    pub top_limit: usize,
    /// Default number of days in best-day listings
    #[serde(default = "default_best_days_limit")]
    pub best_days_limit: usize,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_base_url() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_timezone() -> String {
    "America/New_York".to_string()
}

fn default_forecast_days() -> u8 {
    16
}

fn default_timeout() -> u32 {
    10
}

fn default_max_retries() -> u32 {
    5
}

fn default_max_backoff() -> u32 {
    5
}

fn default_small_country_threshold() -> usize {
    20
}

fn default_top_limit() -> usize {
    10
}

fn default_best_days_limit() -> usize {
    7
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timezone: default_timezone(),
            forecast_days: default_forecast_days(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            max_backoff_seconds: default_max_backoff(),
        }
    }
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            small_country_threshold: default_small_country_threshold(),
            top_limit: default_top_limit(),
            best_days_limit: default_best_days_limit(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl SnowlineConfig {
    /// Load configuration from `snowline.toml` and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from the given file, falling back to `snowline.toml`.
    ///
    /// Environment variables prefixed with `SNOWLINE_` override file values,
    /// with `__` separating sections (`SNOWLINE_FORECAST__API_KEY`).
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("snowline.toml"));

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("SNOWLINE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: SnowlineConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Replace empty or zero values with their defaults
    pub fn apply_defaults(&mut self) {
        if self.forecast.base_url.is_empty() {
            self.forecast.base_url = default_base_url();
        }
        if self.forecast.timezone.is_empty() {
            self.forecast.timezone = default_timezone();
        }
        if self.forecast.forecast_days == 0 {
            self.forecast.forecast_days = default_forecast_days();
        }
        if self.forecast.timeout_seconds == 0 {
            self.forecast.timeout_seconds = default_timeout();
        }
        if self.region.small_country_threshold == 0 {
            self.region.small_country_threshold = default_small_country_threshold();
        }
        if self.region.top_limit == 0 {
            self.region.top_limit = default_top_limit();
        }
        if self.region.best_days_limit == 0 {
            self.region.best_days_limit = default_best_days_limit();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_forecast()?;
        self.validate_logging()?;
        Ok(())
    }

    fn validate_forecast(&self) -> Result<()> {
        let forecast = &self.forecast;

        if !forecast.base_url.starts_with("http://") && !forecast.base_url.starts_with("https://")
        {
            return Err(SnowError::config(
                "Forecast base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        if forecast.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(SnowError::config(format!(
                "Unknown timezone '{}'",
                forecast.timezone
            ))
            .into());
        }

        if !(1..=16).contains(&forecast.forecast_days) {
            return Err(SnowError::config("Forecast days must be between 1 and 16").into());
        }

        if forecast.timeout_seconds > 300 {
            return Err(SnowError::config("Forecast timeout cannot exceed 300 seconds").into());
        }

        if forecast.max_retries > 20 {
            return Err(SnowError::config("Forecast max retries cannot exceed 20").into());
        }

        if forecast.max_backoff_seconds > 60 {
            return Err(SnowError::config("Forecast backoff cannot exceed 60 seconds").into());
        }

        if let Some(api_key) = &forecast.api_key {
            if api_key.trim().is_empty() {
                return Err(SnowError::config(
                    "Forecast API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }
        }

        Ok(())
    }

    fn validate_logging(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SnowError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SnowError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SnowlineConfig::default();
        assert_eq!(config.forecast.base_url, "https://api.open-meteo.com");
        assert_eq!(config.forecast.timezone, "America/New_York");
        assert_eq!(config.forecast.forecast_days, 16);
        assert_eq!(config.forecast.timeout_seconds, 10);
        assert_eq!(config.region.small_country_threshold, 20);
        assert_eq!(config.region.top_limit, 10);
        assert_eq!(config.region.best_days_limit, 7);
        assert!(config.forecast.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_timezone() {
        let mut config = SnowlineConfig::default();
        config.forecast.timezone = "Mars/Olympus_Mons".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Unknown timezone"));
    }

    #[test]
    fn test_forecast_days_range() {
        let mut config = SnowlineConfig::default();
        config.forecast.forecast_days = 17;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = SnowlineConfig::default();
        config.logging.level = "loud".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let mut config = SnowlineConfig::default();
        config.forecast.api_key = Some("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults() {
        let mut config = SnowlineConfig::default();
        config.forecast.base_url.clear();
        config.region.top_limit = 0;
        config.apply_defaults();
        assert_eq!(config.forecast.base_url, "https://api.open-meteo.com");
        assert_eq!(config.region.top_limit, 10);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[forecast]\nbase_url = \"http://localhost:8080\"\nmax_retries = 2\n\n[region]\nsmall_country_threshold = 12"
        )
        .unwrap();

        let config = SnowlineConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.forecast.base_url, "http://localhost:8080");
        assert_eq!(config.forecast.max_retries, 2);
        assert_eq!(config.region.small_country_threshold, 12);
        assert_eq!(config.forecast.forecast_days, 16);
    }
}
