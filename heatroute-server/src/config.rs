use std::{net::SocketAddr, path::Path, path::PathBuf, time::Duration};

use heatroute_core::{EvacuationModelConfig, WeatherFeatures};
use serde::Deserialize;

/// Contents of the server's TOML configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: HttpSettings,
    pub model: EvacuationModelConfig,
    #[serde(default)]
    pub routing: RoutingSettings,
    /// Weather used for any reading a route request leaves out
    #[serde(default)]
    pub weather: WeatherFeatures,
    #[serde(default)]
    pub gazetteer: Option<GazetteerSettings>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub bind: SocketAddr,
    pub request_timeout_secs: u64,
    pub concurrency_limit: usize,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8083)),
            request_timeout_secs: 60,
            concurrency_limit: 64,
        }
    }
}

impl HttpSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoutingSettings {
    /// Budget of the three searches of one request
    pub search_timeout_secs: u64,
    /// Heat index (°F) from which the scenario is `Moderate`
    pub heat_index_moderate: f64,
    /// Heat index (°F) from which the scenario is `High`
    pub heat_index_high: f64,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            search_timeout_secs: 30,
            heat_index_moderate: 80.0,
            heat_index_high: 90.0,
        }
    }
}

impl RoutingSettings {
    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GazetteerSettings {
    /// CSV with `address`, `latitude`, `longitude`
    pub path: PathBuf,
}

impl ServerConfig {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config '{}': {e}", path.display()))?;
        Ok(toml::from_str(&text)?)
    }
}
