//! Configuration management
//!
//! Handles loading and validation of configuration from:
//! - TOML files
//! - JSON files (by `.json` extension)
//! - CLI arguments
//!
//! # Example
//!
//! ```toml
//! [matcher]
//! cookie_ports = [3389]
//! cookie_ips = ["10.0.0.0/8"]
//!
//! [listener]
//! listen_addr = "0.0.0.0:3389"
//! read_timeout_ms = 5000
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

use crate::matcher::{MatchCriteria, RdpMatcher};

pub mod types;

pub use types::{ListenerConfig, LoggingConfig};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Match criteria
    #[serde(default)]
    pub matcher: MatchCriteria,
    /// Listener configuration
    #[serde(default)]
    pub listener: ListenerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load and validate configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from file without validating it
    ///
    /// For callers that apply overrides (or set up logging) before
    /// [`validate`](Self::validate).
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        };
        parsed.with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse TOML configuration
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid TOML configuration")
    }

    /// Parse JSON configuration
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Invalid JSON configuration")
    }

    /// Create default configuration
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.listener
            .listen_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid listen address: {}", self.listener.listen_addr))?;

        if self.listener.read_timeout_ms == 0 {
            anyhow::bail!("read_timeout_ms must be greater than zero");
        }
        if self.listener.max_connections == 0 {
            anyhow::bail!("max_connections must be greater than zero");
        }

        match self.logging.format.as_str() {
            "pretty" | "compact" | "json" => {}
            other => anyhow::bail!("Invalid log format: {}", other),
        }

        self.matcher
            .provision()
            .context("Invalid matcher criteria")?;

        for (a, b) in self.matcher.conflicts() {
            warn!(
                "matcher criteria {} and {} need different payload kinds; nothing will match",
                a, b
            );
        }

        Ok(())
    }

    /// Provision the configured criteria
    pub fn matcher(&self) -> Result<RdpMatcher> {
        self.matcher
            .provision()
            .context("Invalid matcher criteria")
    }

    /// Client read timeout for the listener
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.listener.read_timeout_ms)
    }

    /// Override config with CLI arguments
    pub fn with_overrides(mut self, listen: Option<String>, port: Option<u16>) -> Self {
        if let Some(listen_addr) = listen {
            self.listener.listen_addr = listen_addr;
        }

        if let Some(port) = port {
            if let Ok(mut addr) = self.listener.listen_addr.parse::<SocketAddr>() {
                addr.set_port(port);
                self.listener.listen_addr = addr.to_string();
            }
        }

        self
    }
}
