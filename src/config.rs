use crate::error::{FlowForgeError, FlowResult};
use crate::workflow::node::Position;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const ENV_API_URL: &str = "FLOWFORGE_API_URL";
pub const ENV_TIMEOUT_MS: &str = "FLOWFORGE_TIMEOUT_MS";
pub const ENV_LOG: &str = "FLOWFORGE_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub layout: LayoutConfig,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            layout: LayoutConfig::default(),
            log_filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_ms: 30_000,
        }
    }
}

/// Placement of nodes on the editor canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal coordinate shared by every defaulted node.
    pub column_x: f64,
    /// Vertical distance between consecutive defaulted nodes.
    pub node_spacing: f64,
    /// Where the start node of a brand new workflow is placed.
    pub start_position: Position,
}

impl LayoutConfig {
    /// Default position of the node at zero-based `index` in insertion order.
    pub fn slot(&self, index: usize) -> Position {
        Position::new(self.column_x, (index as f64 + 1.0) * self.node_spacing)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_x: 250.0,
            node_spacing: 100.0,
            start_position: Position::new(250.0, 5.0),
        }
    }
}

impl AppConfig {
    pub fn from_json_str(raw: &str) -> FlowResult<Self> {
        serde_json::from_str::<AppConfig>(raw).map_err(|error| FlowForgeError::Config(error.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> FlowResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|error| FlowForgeError::Config(format!("{}: {}", path.display(), error)))?;
        Self::from_json_str(&raw)
    }

    pub fn with_env_overrides(self) -> FlowResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> FlowResult<Self> {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            self.api.timeout_ms = raw.trim().parse().map_err(|_| {
                FlowForgeError::Config(format!("{} must be a number of milliseconds, got {:?}", ENV_TIMEOUT_MS, raw))
            })?;
        }
        if let Some(filter) = lookup(ENV_LOG) {
            self.log_filter = filter;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AppConfig::from_json_str(r#"{ "api": { "base_url": "https://flows.example.com/api" } }"#).unwrap();
        assert_eq!(config.api.base_url, "https://flows.example.com/api");
        assert_eq!(config.api.timeout_ms, 30_000);
        assert_eq!(config.layout, LayoutConfig::default());
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let result = AppConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(FlowForgeError::Config(_))));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [(ENV_API_URL, "http://10.0.0.2/api"), (ENV_TIMEOUT_MS, "1500"), (ENV_LOG, "debug")]
            .into_iter()
            .collect();
        let config = AppConfig::default()
            .with_overrides(|key| vars.get(key).map(|value| value.to_string()))
            .unwrap();
        assert_eq!(config.api.base_url, "http://10.0.0.2/api");
        assert_eq!(config.api.timeout(), Duration::from_millis(1500));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_bad_timeout_override() {
        let result = AppConfig::default().with_overrides(|key| (key == ENV_TIMEOUT_MS).then(|| "soon".to_string()));
        assert!(matches!(result, Err(FlowForgeError::Config(_))));
    }

    #[test]
    fn test_layout_slot() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.slot(0), Position::new(250.0, 100.0));
        assert_eq!(layout.slot(3), Position::new(250.0, 400.0));
    }
}
