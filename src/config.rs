//! Configuration management for the `mcp-apps` server
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings. Upstream base
//! URLs live here and are handed to each client at construction, so tests and
//! staging deployments can point the tools at different hosts.

use crate::AppsError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `mcp-apps` server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppsConfig {
    /// Third-party API endpoints
    pub upstream: UpstreamConfig,
    /// Outbound HTTP client settings
    pub http: HttpConfig,
    /// MCP transport settings
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Fast-food search defaults
    pub places: PlacesConfig,
}

/// Base URLs of the proxied APIs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub geocoding_base_url: String,
    pub forecast_base_url: String,
    pub agify_base_url: String,
    pub nominatim_base_url: String,
    pub overpass_base_url: String,
}

/// Outbound HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User agent sent upstream (Nominatim rejects anonymous clients)
    pub user_agent: String,
    /// Request timeout; unset means the client default
    pub timeout_seconds: Option<u32>,
}

/// Which transport `serve` speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Newline-delimited JSON-RPC on stdin/stdout
    Stdio,
    /// JSON-RPC over `POST /mcp`
    Http,
}

/// MCP transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub transport: Transport,
    pub host: String,
    pub port: u16,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

/// Fast-food search defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacesConfig {
    /// Search radius used when the caller gives none
    pub radius_meters: u32,
    /// Maximum number of places returned
    pub limit: usize,
}

pub const MIN_RADIUS_METERS: u32 = 100;
pub const MAX_RADIUS_METERS: u32 = 5_000;

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            geocoding_base_url: "https://geocoding-api.open-meteo.com".to_string(),
            forecast_base_url: "https://api.open-meteo.com".to_string(),
            agify_base_url: "https://api.agify.io".to_string(),
            nominatim_base_url: "https://nominatim.openstreetmap.org".to_string(),
            overpass_base_url: "https://overpass-api.de".to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("mcp-apps/{}", crate::VERSION),
            timeout_seconds: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: Transport::Stdio,
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            radius_meters: 1_000,
            limit: 10,
        }
    }
}

impl AppsConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.or_else(Self::get_config_path);

        if let Some(config_file) = config_file.filter(|path| path.exists()) {
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // MCP_APPS_SERVER__PORT=9000 style overrides
        builder = builder.add_source(
            Environment::with_prefix("MCP_APPS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AppsConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mcp-apps").join("config.toml"))
    }

    /// Replace blank values with their defaults
    pub fn apply_defaults(&mut self) {
        let upstream = UpstreamConfig::default();
        let fill = |value: &mut String, default: String| {
            if value.trim().is_empty() {
                *value = default;
            }
        };
        fill(&mut self.upstream.geocoding_base_url, upstream.geocoding_base_url);
        fill(&mut self.upstream.forecast_base_url, upstream.forecast_base_url);
        fill(&mut self.upstream.agify_base_url, upstream.agify_base_url);
        fill(&mut self.upstream.nominatim_base_url, upstream.nominatim_base_url);
        fill(&mut self.upstream.overpass_base_url, upstream.overpass_base_url);
        fill(&mut self.http.user_agent, HttpConfig::default().user_agent);
        fill(&mut self.logging.level, LoggingConfig::default().level);
        fill(&mut self.logging.format, LoggingConfig::default().format);
        fill(&mut self.server.host, ServerConfig::default().host);
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_urls()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_urls(&self) -> Result<()> {
        let urls = [
            ("geocoding_base_url", &self.upstream.geocoding_base_url),
            ("forecast_base_url", &self.upstream.forecast_base_url),
            ("agify_base_url", &self.upstream.agify_base_url),
            ("nominatim_base_url", &self.upstream.nominatim_base_url),
            ("overpass_base_url", &self.upstream.overpass_base_url),
        ];

        for (key, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(AppsError::config(format!(
                    "upstream.{key} must be a valid HTTP or HTTPS URL, got '{url}'"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if let Some(timeout) = self.http.timeout_seconds {
            if timeout == 0 || timeout > 300 {
                return Err(AppsError::config(
                    "HTTP timeout must be between 1 and 300 seconds",
                )
                .into());
            }
        }

        if !(MIN_RADIUS_METERS..=MAX_RADIUS_METERS).contains(&self.places.radius_meters) {
            return Err(AppsError::config(format!(
                "Search radius must be between {MIN_RADIUS_METERS} and {MAX_RADIUS_METERS} meters"
            ))
            .into());
        }

        if !(1..=50).contains(&self.places.limit) {
            return Err(AppsError::config("Place limit must be between 1 and 50").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AppsError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AppsError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}
