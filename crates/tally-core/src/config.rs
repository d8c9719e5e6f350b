//! Configuration for tally
//!
//! Stored in tally.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "tally.toml";
const CONFIG_ENV: &str = "TALLY_CONFIG";

/// tally configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// API server settings
    pub server: ServerConfig,

    /// Seed settings for the debug seed route
    pub seed: SeedConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub host: String,

    /// Listen port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// Base URL clients use to reach the server
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Seed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Item count when the seed route is called without `n`
    pub default_count: u32,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self { default_count: 8 }
    }
}

impl Config {
    /// Load config from a TOML file, falling back to defaults if the
    /// file does not exist
    pub fn load(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        Ok(config)
    }

    /// Load config from the first location that resolves
    pub fn load_default() -> crate::Result<Self> {
        match Self::locate() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Resolve the config file path: $TALLY_CONFIG, then ./tally.toml,
    /// then the user config directory
    pub fn locate() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }

        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }

        dirs::config_dir().map(|dir| dir.join("tally").join(CONFIG_FILE))
    }
}
