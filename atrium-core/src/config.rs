use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};
use utoipa::ToSchema;

use crate::error::ConfigError;

/// Limits and estimation constants for the workspace components.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct WorkspaceConfig {
    #[serde(default = "default_list_limit")]
    pub default_list_limit: usize,

    #[serde(default = "default_max_limit")]
    pub max_list_limit: usize,

    #[serde(default = "default_conversation_limit")]
    pub default_conversation_limit: usize,

    #[serde(default = "default_max_limit")]
    pub max_conversation_limit: usize,

    #[serde(default)]
    pub image_tokens: ImageTokenConfig,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            default_list_limit: default_list_limit(),
            max_list_limit: default_max_limit(),
            default_conversation_limit: default_conversation_limit(),
            max_conversation_limit: default_max_limit(),
            image_tokens: ImageTokenConfig::default(),
        }
    }
}

impl WorkspaceConfig {
    /// Resolve a requested workspace page size, falling back to the default
    /// for missing or zero values.
    pub fn list_limit(&self, requested: Option<usize>) -> usize {
        clamp_limit(requested, self.default_list_limit, self.max_list_limit)
    }

    pub fn conversation_limit(&self, requested: Option<usize>) -> usize {
        clamp_limit(
            requested,
            self.default_conversation_limit,
            self.max_conversation_limit,
        )
    }
}

fn clamp_limit(requested: Option<usize>, default: usize, max: usize) -> usize {
    match requested {
        Some(0) | None => default.min(max),
        Some(limit) => limit.min(max),
    }
}

/// Pixel heuristic used for images without extracted text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ImageTokenConfig {
    #[serde(default = "default_pixels_per_token")]
    pub pixels_per_token: u64,

    #[serde(default = "default_max_image_tokens")]
    pub max_tokens: u64,
}

impl Default for ImageTokenConfig {
    fn default() -> Self {
        Self {
            pixels_per_token: default_pixels_per_token(),
            max_tokens: default_max_image_tokens(),
        }
    }
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> Result<T, ConfigError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> Result<T, ConfigError> {
    Ok(serde_json::from_str(s)?)
}

fn default_list_limit() -> usize {
    20
}

fn default_conversation_limit() -> usize {
    25
}

fn default_max_limit() -> usize {
    100
}

fn default_pixels_per_token() -> u64 {
    750
}

fn default_max_image_tokens() -> u64 {
    1600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_config_defaults_from_empty_json() {
        let config: WorkspaceConfig = from_str("{}").unwrap();
        assert_eq!(config, WorkspaceConfig::default());
        assert_eq!(config.image_tokens.pixels_per_token, 750);
        assert_eq!(config.image_tokens.max_tokens, 1600);
    }

    #[test]
    fn test_limits_are_capped_and_defaulted() {
        let config = WorkspaceConfig::default();
        assert_eq!(config.list_limit(None), 20);
        assert_eq!(config.list_limit(Some(0)), 20);
        assert_eq!(config.list_limit(Some(7)), 7);
        assert_eq!(config.list_limit(Some(500)), 100);
        assert_eq!(config.conversation_limit(None), 25);
        assert_eq!(config.conversation_limit(Some(101)), 100);
    }
}
