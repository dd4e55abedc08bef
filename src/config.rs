//! Configuration management for the gateway.
//!
//! Handles loading configuration from TOML files, with sections for the HTTP
//! listener and the SQLite database the gateway forwards statements to.

use crate::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Main configuration structure for the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// HTTP listener configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Service name reported by the health endpoint.
    #[serde(default = "default_service")]
    pub service: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_service() -> String {
    "db-gateway".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            service: default_service(),
        }
    }
}

impl ServerConfig {
    /// Returns the `host:port` string to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    /// SQLite URL (`sqlite:data.db`, `sqlite::memory:`) or a plain file path.
    #[serde(default = "default_url")]
    pub url: String,

    /// Database identifier reported by the health endpoint.
    /// Defaults to the file stem of the URL.
    pub name: Option<String>,

    /// Maximum pooled connections. In-memory databases always use one.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds to wait on a locked database before failing.
    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,
}

fn default_url() -> String {
    "sqlite:gateway.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_busy_timeout_secs() -> u64 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            name: None,
            max_connections: default_max_connections(),
            busy_timeout_secs: default_busy_timeout_secs(),
        }
    }
}

impl DatabaseConfig {
    /// Creates a database config for the given URL or path, with defaults
    /// for everything else.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Returns the connection string handed to the SQLite driver.
    ///
    /// Plain paths are turned into `sqlite:` URLs; URLs with any other scheme
    /// are rejected.
    pub fn to_connection_string(&self) -> Result<String> {
        let raw = self.url.trim();
        if raw.is_empty() {
            return Err(GatewayError::config("Database URL is required"));
        }
        if raw.starts_with("sqlite:") {
            return Ok(raw.to_string());
        }

        match Url::parse(raw) {
            // Windows drive letters parse as a one-letter scheme.
            Ok(url) if url.scheme().len() == 1 => Ok(format!("sqlite:{raw}")),
            Ok(url) => Err(GatewayError::config(format!(
                "Invalid scheme '{}'. Expected 'sqlite'",
                url.scheme()
            ))),
            Err(_) => Ok(format!("sqlite:{raw}")),
        }
    }

    /// Returns true if the URL names an in-memory database.
    pub fn is_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }

    /// Returns the database identifier for display purposes.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        if self.is_memory() {
            return "memory".to_string();
        }

        let path = self
            .url
            .trim()
            .trim_start_matches("sqlite:")
            .trim_start_matches("//");
        let path = path.split('?').next().unwrap_or(path);

        Path::new(path)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .unwrap_or("unknown")
            .to_string()
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("db-gateway")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the default configuration.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| GatewayError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            GatewayError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
