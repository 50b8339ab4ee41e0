//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Executable run when a request carries no override
    pub default_executable: String,

    /// Maximum time for a single external tool invocation (seconds)
    pub tool_timeout_secs: u64,

    /// Binary values longer than this many bytes are dropped by the fast parser
    pub blob_limit: usize,
}

impl ExtractorConfig {
    /// Get the tool timeout as a Duration
    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.default_executable.trim().is_empty() {
            return Err("default_executable must not be empty".to_string());
        }
        if self.tool_timeout_secs == 0 {
            return Err("tool_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            default_executable: "exiftool".to_string(),
            tool_timeout_secs: 120,
            blob_limit: 64,
        }
    }
}
