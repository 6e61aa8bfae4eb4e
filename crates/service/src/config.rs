//! Service configuration loaded from YAML

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use flightpanel_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Complete panelsd configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// Connect every panel before serving requests
    pub connect_on_start: bool,
    /// Input events kept for `GET /api/events`
    pub recent_events: usize,
    /// Panel engine tunables
    pub engine: EngineConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            connect_on_start: true,
            recent_events: 50,
            engine: EngineConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load from `path`; a missing file yields the defaults.
    pub async fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config")
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address
            .parse()
            .with_context(|| format!("Invalid bind address: {}", self.bind_address))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;
        if self.recent_events == 0 {
            anyhow::bail!("recent_events must be at least 1");
        }
        self.engine
            .validate()
            .context("Invalid engine configuration")?;
        Ok(())
    }
}
