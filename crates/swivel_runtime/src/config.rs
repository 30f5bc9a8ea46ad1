//! Runtime configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use swivel_animation::AnimationConfig;

/// Configuration for the toggle runtime
///
/// ```toml
/// skip_animations = false
/// max_block_count = 4096
///
/// [animation]
/// tick_rate = 20
///
/// [animation.archetypes.portcullis]
/// speed = 1.5
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub animation: AnimationConfig,
    /// Place every structure in its final state without animating
    pub skip_animations: bool,
    /// Structures with more blocks are rejected
    pub max_block_count: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuntimeConfig {
    pub fn standard() -> Self {
        Self {
            animation: AnimationConfig::standard(),
            skip_animations: false,
            max_block_count: None,
        }
    }

    /// Short animations and no audio
    pub fn testing() -> Self {
        Self {
            animation: AnimationConfig::testing(),
            ..Self::standard()
        }
    }

    pub fn with_animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;
        self
    }

    pub fn with_skip_animations(mut self, skip: bool) -> Self {
        self.skip_animations = skip;
        self
    }

    pub fn with_max_block_count(mut self, limit: u64) -> Self {
        self.max_block_count = Some(limit);
        self
    }

    /// Read a TOML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: RuntimeConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize runtime config")
    }
}
