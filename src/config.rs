//! Configuration management for the `WeatherWise` service
//!
//! Handles loading configuration from an optional TOML file and environment
//! variables, and provides validation for all configuration settings.

use crate::WeatherWiseError;
use anyhow::{Context, Result};
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Well-known environment variables and the config keys they override
const WELL_KNOWN_VARS: [(&str, &str); 6] = [
    ("WEATHERAPI_KEY", "weather.api_key"),
    ("GEMINI_API_KEY", "llm.api_key"),
    ("GEMINI_MODEL", "llm.model"),
    ("APP_ENV", "environment"),
    ("HOST", "server.host"),
    ("PORT", "server.port"),
];

/// Root configuration structure for the `WeatherWise` service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherWiseConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Weather provider configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// LLM provider configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Runtime environment
    #[serde(default)]
    pub environment: RuntimeEnvironment,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_server_host")]
    pub host: String,
    /// Bind port
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Directory with a built frontend to serve, if any
    #[serde(default)]
    pub static_dir: Option<String>,
}

/// Weather provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// weatherapi.com key. Without it, development falls back to a mock forecast.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL for the weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// Retries for transient failures
    #[serde(default)]
    pub max_retries: u32,
}

/// LLM provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Gemini API key. Without it every day uses the rule table.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model identifier
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Base URL for the Generative Language API
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u32,
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

/// Runtime environment flag
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Production,
}

// Default value functions
fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    5000
}

fn default_weather_base_url() -> String {
    "https://api.weatherapi.com/v1".to_string()
}

fn default_weather_timeout() -> u32 {
    12
}

fn default_llm_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_llm_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_llm_timeout() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            static_dir: None,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            timeout_seconds: default_weather_timeout(),
            max_retries: 0,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_llm_model(),
            base_url: default_llm_base_url(),
            timeout_seconds: default_llm_timeout(),
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

impl Default for WeatherWiseConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            weather: WeatherConfig::default(),
            llm: LlmConfig::default(),
            logging: LoggingConfig::default(),
            environment: RuntimeEnvironment::default(),
        }
    }
}

impl WeatherWiseConfig {
    /// Load configuration from `.env`, file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        // A missing .env file is the normal case outside local development
        let _ = dotenvy::dotenv();

        let config_file = config_path.unwrap_or_else(Self::get_config_path);
        let mut builder = Config::builder();

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Nested overrides such as WEATHERWISE_WEATHER__TIMEOUT_SECONDS
        builder = builder.add_source(
            Environment::with_prefix("WEATHERWISE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder = Self::apply_well_known_vars(builder, |name| std::env::var(name).ok())?;

        Self::from_builder(builder)
    }

    /// Build, fill defaults and validate
    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WeatherWiseConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Override config keys with the plain environment variables the
    /// deployment has always used (`WEATHERAPI_KEY`, `PORT`, ...)
    fn apply_well_known_vars<F>(
        mut builder: ConfigBuilder<DefaultState>,
        lookup: F,
    ) -> Result<ConfigBuilder<DefaultState>>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (var, key) in WELL_KNOWN_VARS {
            let value = lookup(var).filter(|v| !v.trim().is_empty());
            builder = builder
                .set_override_option(key, value)
                .with_context(|| format!("Failed to apply {var}"))?;
        }
        Ok(builder)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> PathBuf {
        PathBuf::from("weatherwise.toml")
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.llm.model.is_empty() {
            self.llm.model = default_llm_model();
        }
        if self.llm.base_url.is_empty() {
            self.llm.base_url = default_llm_base_url();
        }
        if self.llm.timeout_seconds == 0 {
            self.llm.timeout_seconds = default_llm_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }

        // Blank keys mean "not configured"
        if self.weather.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            self.weather.api_key = None;
        }
        if self.llm.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            self.llm.api_key = None;
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        if self.environment == RuntimeEnvironment::Production && self.weather.api_key.is_none() {
            return Err(WeatherWiseError::config(
                "WEATHERAPI_KEY is required in production. Mock forecasts are development-only.",
            )
            .into());
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 {
            return Err(
                WeatherWiseError::config("Weather API timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.weather.max_retries > 10 {
            return Err(WeatherWiseError::config("Weather API max retries cannot exceed 10").into());
        }

        if self.llm.timeout_seconds > 300 {
            return Err(WeatherWiseError::config("LLM timeout cannot exceed 300 seconds").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeatherWiseError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeatherWiseError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Weather API", &self.weather.base_url),
            ("LLM API", &self.llm.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(WeatherWiseError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
