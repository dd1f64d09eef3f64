//! Configuration management for `WeatherDigest`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::DigestError;
use crate::location_parser::{parse_locations_json, split_locations};
use crate::models::{Location, LocationRequest, UnitSystem};
use crate::schedule::Scheduler;
use anyhow::{Context, Result};
use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Prefix of environment variable overrides, e.g. `WEATHERDIGEST_WEATHER__API_KEY`
pub const ENV_PREFIX: &str = "WEATHERDIGEST";

/// Root configuration structure for the `WeatherDigest` application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestConfig {
    /// Weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Locations to report on
    #[serde(default)]
    pub locations: Vec<Location>,
    /// Locations as a JSON-encoded array string; merged after `locations`
    #[serde(default)]
    pub locations_json: Option<String>,
    /// SMTP delivery settings
    #[serde(default)]
    pub email: EmailConfig,
    /// When scheduled runs happen
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// PirateWeather API key
    pub api_key: Option<String>,
    /// Base URL for weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Unit system requested for every location
    #[serde(default)]
    pub units: UnitSystem,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for transient failures
    #[serde(default = "default_weather_max_retries")]
    pub max_retries: u32,
    /// Forecast requests in flight at once
    #[serde(default = "default_weather_concurrency")]
    pub concurrency: usize,
    /// Timezone for clock times when the API response has none
    #[serde(default = "default_timezone")]
    pub fallback_timezone: String,
}

/// SMTP delivery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// SMTP relay host
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP port; derived from `tls` when unset
    #[serde(default)]
    pub smtp_port: Option<u16>,
    /// Transport security: tls, starttls or none
    #[serde(default = "default_smtp_tls")]
    pub tls: String,
    /// SMTP username
    pub username: Option<String>,
    /// SMTP password
    pub password: Option<String>,
    /// Sender mailbox, e.g. `Weather <weather@example.com>`
    pub from: Option<String>,
    /// Recipient mailboxes
    #[serde(default)]
    pub to: Vec<String>,
}

/// Schedule settings for the `schedule` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Cron expression with a seconds field (sec min hour dom month dow)
    #[serde(default = "default_schedule_cron")]
    pub cron: String,
    /// Timezone the cron expression is evaluated in and the digest is dated
    /// in; empty means `weather.fallback_timezone`
    #[serde(default)]
    pub timezone: String,
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

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.pirateweather.net".to_string()
}

fn default_weather_timeout() -> u32 {
    30
}

fn default_weather_max_retries() -> u32 {
    3
}

fn default_weather_concurrency() -> usize {
    1
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_tls() -> String {
    "starttls".to_string()
}

fn default_schedule_cron() -> String {
    // daily at 07:00
    "0 0 7 * * *".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            units: UnitSystem::default(),
            timeout_seconds: default_weather_timeout(),
            max_retries: default_weather_max_retries(),
            concurrency: default_weather_concurrency(),
            fallback_timezone: default_timezone(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: None,
            tls: default_smtp_tls(),
            username: None,
            password: None,
            from: None,
            to: Vec::new(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cron: default_schedule_cron(),
            timezone: String::new(),
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

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            weather: WeatherConfig::default(),
            locations: Vec::new(),
            locations_json: None,
            email: EmailConfig::default(),
            schedule: ScheduleConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl DigestConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // An explicit path must exist; the default locations are optional
        let (config_file, required) = match config_path {
            Some(path) => (path, true),
            None => (
                Self::get_config_path()
                    .filter(|path| path.exists())
                    .unwrap_or_else(|| PathBuf::from("config.toml")),
                false,
            ),
        };

        if required || config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(required)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides with WEATHERDIGEST_ prefix
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| format!("Failed to build configuration from {}", config_file.display()))?;

        let mut config: DigestConfig = settings
            .try_deserialize()
            .with_context(|| format!("Failed to deserialize configuration from {}", config_file.display()))?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weatherdigest").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.weather.concurrency == 0 {
            self.weather.concurrency = default_weather_concurrency();
        }
        if self.weather.fallback_timezone.is_empty() {
            self.weather.fallback_timezone = default_timezone();
        }
        if self.schedule.cron.is_empty() {
            self.schedule.cron = default_schedule_cron();
        }
        if self.schedule.timezone.is_empty() {
            self.schedule.timezone = self.weather.fallback_timezone.clone();
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
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.all_locations()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        if let Some(api_key) = &self.weather.api_key {
            if api_key.trim().is_empty() {
                return Err(DigestError::config(
                    "Weather API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }

            if api_key.len() > 100 {
                return Err(DigestError::config(
                    "Weather API key appears to be invalid (too long). Please check your API key.",
                )
                .into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 {
            return Err(DigestError::config("Weather API timeout cannot exceed 300 seconds").into());
        }

        if self.weather.max_retries > 10 {
            return Err(DigestError::config("Weather API max retries cannot exceed 10").into());
        }

        if self.weather.concurrency > 16 {
            return Err(DigestError::config("Weather API concurrency cannot exceed 16").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(DigestError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(DigestError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let valid_tls = ["tls", "starttls", "none"];
        if !valid_tls.contains(&self.email.tls.as_str()) {
            return Err(DigestError::config(format!(
                "Invalid email tls mode '{}'. Must be one of: {}",
                self.email.tls,
                valid_tls.join(", ")
            ))
            .into());
        }

        if !self.weather.base_url.starts_with("http://")
            && !self.weather.base_url.starts_with("https://")
        {
            return Err(
                DigestError::config("Weather API base URL must be a valid HTTP or HTTPS URL").into(),
            );
        }

        self.fallback_timezone()?;
        Scheduler::from_config(&self.schedule)?;

        Ok(())
    }

    /// Structured locations followed by the ones from `locations_json`,
    /// each validated.
    pub fn all_locations(&self) -> crate::Result<Vec<Location>> {
        let mut locations = self.locations.clone();
        if let Some(encoded) = &self.locations_json {
            locations.extend(parse_locations_json(encoded)?);
        }
        for location in &locations {
            location.validate()?;
        }
        Ok(locations)
    }

    /// One request per configured location; requires an API key.
    pub fn location_requests(&self) -> crate::Result<Vec<LocationRequest>> {
        let api_key = self
            .weather
            .api_key
            .as_deref()
            .ok_or_else(|| DigestError::config("weather.api_key is required to fetch forecasts"))?;
        Ok(split_locations(
            api_key,
            self.weather.units,
            &self.all_locations()?,
        ))
    }

    /// Timezone for clock times when a forecast carries none
    pub fn fallback_timezone(&self) -> crate::Result<Tz> {
        let name = &self.weather.fallback_timezone;
        name.parse::<Tz>()
            .map_err(|_| DigestError::config(format!("Unknown timezone '{name}'")))
    }

    /// Timezone the digest is dated in: the schedule's, else the fallback
    pub fn report_timezone(&self) -> crate::Result<Tz> {
        let name = &self.schedule.timezone;
        if name.is_empty() {
            return self.fallback_timezone();
        }
        name.parse::<Tz>()
            .map_err(|_| DigestError::config(format!("Unknown timezone '{name}'")))
    }
}
