//! # Configuration
//!
//! JSON configuration file for the rulebase process. Loaded once at
//! startup by the CLI; the store and HTTP server receive plain values
//! from here and never read the file themselves.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cli::errors::{CliError, CliResult};
use crate::http_server::HttpServerConfig;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "./rulebase.json";

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one JSON file per rule
    #[serde(default = "default_rules_dir")]
    pub rules_dir: String,

    /// HTTP server settings
    #[serde(default)]
    pub http: HttpServerConfig,
}

fn default_rules_dir() -> String {
    "./rules".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules_dir: default_rules_dir(),
            http: HttpServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Write configuration to file (used by `init`)
    pub fn save(&self, path: &Path) -> CliResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| CliError::config_error(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)
            .map_err(|e| CliError::config_error(format!("Failed to write config: {}", e)))
    }

    /// Validate configuration
    fn validate(&self) -> CliResult<()> {
        if self.rules_dir.trim().is_empty() {
            return Err(CliError::config_error("rules_dir must not be empty"));
        }
        if self.http.port == 0 {
            return Err(CliError::config_error("http.port must be non-zero"));
        }
        Ok(())
    }
}
