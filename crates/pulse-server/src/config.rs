use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file consulted when none is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "config/server.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// SQLite file holding the five dashboard tables
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Seed document read by the `seed` subcommand
    #[serde(default = "default_seed_path")]
    pub seed_path: String,
    /// CORS allowed origins; empty allows any origin
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            database_path: default_database_path(),
            seed_path: default_seed_path(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

fn default_http_port() -> u16 {
    5001
}

fn default_database_path() -> String {
    "marketing.db".to_string()
}

fn default_seed_path() -> String {
    "analytics/summary_data.json".to_string()
}

impl ServerConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path, e))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", path, e))?;
        Ok(config)
    }

    /// Loads `path` when it exists. A missing file is only tolerated for the
    /// default location, in which case built-in defaults apply.
    pub fn load_or_default(path: &str) -> anyhow::Result<Self> {
        if path == DEFAULT_CONFIG_PATH && !Path::new(path).exists() {
            tracing::info!(path, "No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Applies process environment overrides (`PORT`).
    pub fn apply_env_overrides(&mut self) {
        self.apply_port_override(std::env::var("PORT").ok().as_deref());
    }

    pub fn apply_port_override(&mut self, port: Option<&str>) {
        let Some(raw) = port.map(str::trim).filter(|p| !p.is_empty()) else {
            return;
        };
        match raw.parse::<u16>() {
            Ok(port) => self.http_port = port,
            Err(e) => tracing::warn!(value = raw, error = %e, "Ignoring invalid PORT override"),
        }
    }
}
