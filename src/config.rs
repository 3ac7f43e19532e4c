//! Analyzer configuration
//!
//! Gap thresholds are policy constants. They can be overridden from a TOML file,
//! with each missing key falling back to its default.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ComputeError;

/// Gaps strictly longer than this are pauses (milliseconds)
pub const DEFAULT_PAUSE_THRESHOLD_MS: u64 = 1000;

/// Gaps strictly shorter than this are bursts (milliseconds)
pub const DEFAULT_BURST_THRESHOLD_MS: u64 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default = "default_pause_threshold_ms")]
    pub pause_threshold_ms: u64,
    #[serde(default = "default_burst_threshold_ms")]
    pub burst_threshold_ms: u64,
}

fn default_pause_threshold_ms() -> u64 {
    DEFAULT_PAUSE_THRESHOLD_MS
}

fn default_burst_threshold_ms() -> u64 {
    DEFAULT_BURST_THRESHOLD_MS
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            pause_threshold_ms: default_pause_threshold_ms(),
            burst_threshold_ms: default_burst_threshold_ms(),
        }
    }
}

impl AnalyzerConfig {
    /// Parse config from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ComputeError> {
        let config: AnalyzerConfig =
            toml::from_str(content).map_err(|e| ComputeError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ComputeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// A burst threshold above the pause threshold would let one gap count as both.
    pub fn validate(&self) -> Result<(), ComputeError> {
        if self.burst_threshold_ms > self.pause_threshold_ms {
            return Err(ComputeError::ConfigError(format!(
                "burst_threshold_ms ({}) must not exceed pause_threshold_ms ({})",
                self.burst_threshold_ms, self.pause_threshold_ms
            )));
        }
        Ok(())
    }
}
