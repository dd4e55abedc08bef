//! Command-line argument parsing for the gateway.
//!
//! Uses clap to parse CLI arguments. Flags (and their `GATEWAY_*`
//! environment variables) override values from the config file.

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// A minimal HTTP-to-SQL gateway for SQLite.
#[derive(Parser, Debug)]
#[command(name = "gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database URL or path (e.g., sqlite:data.db, ./data.db, sqlite::memory:)
    #[arg(value_name = "DATABASE_URL", env = "GATEWAY_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Host to bind to
    #[arg(short = 'H', long, value_name = "HOST", env = "GATEWAY_HOST")]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(short = 'p', long, value_name = "PORT", env = "GATEWAY_PORT")]
    pub port: Option<u16>,

    /// Database identifier reported by the health endpoint
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Service name reported by the health endpoint
    #[arg(long, value_name = "SERVICE")]
    pub service: Option<String>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Overrides config values with any arguments that were given.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(url) = &self.database_url {
            config.database.url = url.clone();
        }
        if let Some(name) = &self.name {
            config.database.name = Some(name.clone());
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(service) = &self.service {
            config.server.service = service.clone();
        }
    }
}
