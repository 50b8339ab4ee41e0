//! Configuration file parsing for the Router.
//!
//! Loads settings from TOML files including bind address, CORS origins, the
//! optional static UI directory, and the extractor section. Environment
//! variables `PORT`, `ALLOWED_ORIGINS` and `STATIC_DIR` override the file.

use exifprobe_extractor::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Router configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is out of range or malformed
    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Router configuration loaded from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 3000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Origins allowed by CORS; `*` allows any
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Directory served for routes that match no API endpoint
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    /// Extraction pipeline settings
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    3000
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl RouterConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: RouterConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Create the default configuration
    pub fn default_config() -> Self {
        RouterConfig {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            allowed_origins: default_allowed_origins(),
            static_dir: None,
            extractor: ExtractorConfig::default(),
        }
    }

    /// Apply `PORT`, `ALLOWED_ORIGINS` and `STATIC_DIR` from the environment
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.bind_port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                field: "PORT".to_string(),
                reason: format!("'{}' is not a port number", port),
            })?;
        }

        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            self.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(dir) = lookup("STATIC_DIR").filter(|d| !d.trim().is_empty()) {
            self.static_dir = Some(PathBuf::from(dir));
        }

        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "bind_address".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.allowed_origins.is_empty() {
            return Err(ConfigError::Invalid {
                field: "allowed_origins".to_string(),
                reason: "at least one origin (or \"*\") is required".to_string(),
            });
        }
        self.extractor
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                field: "extractor".to_string(),
                reason,
            })
    }

    /// Whether CORS allows any origin
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
