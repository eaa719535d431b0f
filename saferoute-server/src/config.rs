use std::path::Path;

use saferoute_core::RouterConfig;
use serde::Deserialize;

/// Service settings, read from an optional TOML file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub router: RouterConfig,
    /// Decimal places used to match segment endpoints into nodes
    pub coordinate_precision: u32,
    /// Number of routes returned when the request does not set `k`
    pub default_k: usize,
    pub request_timeout_secs: u64,
    pub max_concurrent_requests: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            router: RouterConfig::default(),
            coordinate_precision: 6,
            default_k: 3,
            request_timeout_secs: 30,
            max_concurrent_requests: 64,
        }
    }
}

impl ServerConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config '{}': {e}", path.display()))?;
        Ok(Self::from_toml(&text)?)
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
