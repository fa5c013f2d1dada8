//! Config file: `[resolver]` and `[runtime]` tables, CLI overrides on top.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tiltmode_core::{ConfigurationError, ResolverConfig};

use crate::cli::SourceOpts;

pub const DEFAULT_TICK_INTERVAL_MS: u64 = 50;
pub const DEFAULT_MOTION_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeOptions {
    /// Wall-clock tick period for `run`.
    pub tick_interval_ms: u64,
    /// Buffered tilt samples before new ones are dropped.
    pub motion_capacity: usize,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            motion_capacity: DEFAULT_MOTION_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub resolver: ResolverConfig,
    pub runtime: RuntimeOptions,
}

impl FileConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigurationError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or defaults when no file is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_toml_str(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.resolver.validate()?;
        if self.runtime.tick_interval_ms == 0 {
            return Err(ConfigurationError::InvalidOption {
                option: "tick_interval_ms",
                detail: "must be greater than 0".into(),
            });
        }
        if self.runtime.motion_capacity == 0 {
            return Err(ConfigurationError::InvalidOption {
                option: "motion_capacity",
                detail: "must be greater than 0".into(),
            });
        }
        Ok(())
    }

    /// Apply CLI flags, then re-validate.
    pub fn with_overrides(
        mut self,
        sources: &SourceOpts,
        tick_interval_ms: Option<u64>,
    ) -> Result<Self, ConfigurationError> {
        if let Some(ms) = sources.stable_window_ms {
            self.resolver.stable_window_ms = ms;
        }
        if sources.disable_screen_source {
            self.resolver.screen_source_enabled = false;
        }
        if sources.disable_motion_source {
            self.resolver.motion_source_enabled = false;
        }
        if let Some(ms) = tick_interval_ms {
            self.runtime.tick_interval_ms = ms;
        }
        self.validate()?;
        Ok(self)
    }
}
