use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::types::SourceKind;

/// Default stability window (milliseconds).
pub const DEFAULT_STABLE_WINDOW_MS: u64 = 400;

/// Upper bound for the stability window (milliseconds).
pub const MAX_STABLE_WINDOW_MS: u64 = 10_000;

/// Resolver options. Deserialized from the `[resolver]` table of the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// How long a new candidate mode must stay unchallenged before it is announced.
    pub stable_window_ms: u64,
    pub screen_source_enabled: bool,
    pub motion_source_enabled: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            stable_window_ms: DEFAULT_STABLE_WINDOW_MS,
            screen_source_enabled: true,
            motion_source_enabled: true,
        }
    }
}

impl ResolverConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.stable_window_ms > MAX_STABLE_WINDOW_MS {
            return Err(ConfigurationError::StableWindowTooLong {
                value: self.stable_window_ms,
                max: MAX_STABLE_WINDOW_MS,
            });
        }
        Ok(())
    }

    pub fn stable_window(&self) -> TimeDelta {
        // Bounded by MAX_STABLE_WINDOW_MS once validated.
        TimeDelta::milliseconds(self.stable_window_ms.min(MAX_STABLE_WINDOW_MS) as i64)
    }

    pub fn source_enabled(&self, source: SourceKind) -> bool {
        match source {
            SourceKind::Screen => self.screen_source_enabled,
            SourceKind::Motion => self.motion_source_enabled,
        }
    }

    /// True when neither source can ever feed the resolver.
    pub fn all_sources_disabled(&self) -> bool {
        !self.screen_source_enabled && !self.motion_source_enabled
    }
}
