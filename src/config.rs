use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_CLEAR_COLOR: [f32; 3] = [0.1, 0.1, 0.15];
pub const DEFAULT_STATUS_LOG_INTERVAL: u64 = 60;

/// Renderer settings, loadable from a JSON file. Missing fields use defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub width: u32,
    pub height: u32,
    pub clear_color: [f32; 3],
    pub animation_enabled: bool,
    /// Spawn a unit cube at the origin on construction
    pub default_object: bool,
    /// Seed for object speeds; random when absent
    pub seed: Option<u64>,
    /// Log a status line every N frames (0 disables)
    pub status_log_interval: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            clear_color: DEFAULT_CLEAR_COLOR,
            animation_enabled: true,
            default_object: true,
            seed: None,
            status_log_interval: DEFAULT_STATUS_LOG_INTERVAL,
        }
    }
}

impl RendererConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let config = RendererConfig::from_json("{}").unwrap();
        assert_eq!(config, RendererConfig::default());
    }

    #[test]
    fn partial_json_overrides_fields() {
        let config = RendererConfig::from_json(r#"{"width": 320, "seed": 9}"#).unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let result = RendererConfig::from_json("{ width: ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = RendererConfig::from_file("/nonexistent/scene-bridge.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
