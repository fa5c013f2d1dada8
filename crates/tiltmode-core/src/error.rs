//! Error types shared by the resolver and the input sources.
//!
//! Only [`ConfigurationError`] is fatal. [`CapabilityUnavailable`] describes a
//! degraded start: the caller reports it and carries on with whatever sources
//! remain.

use std::fmt;

use thiserror::Error;

/// Integration or configuration defect. Always propagated to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("unknown mode: {0:?}")]
    UnknownMode(String),

    #[error("stable_window_ms {value} exceeds maximum {max}")]
    StableWindowTooLong { value: u64, max: u64 },

    #[error("invalid option {option}: {detail}")]
    InvalidOption { option: &'static str, detail: String },

    #[error("config parse error: {0}")]
    Parse(String),
}

impl From<toml::de::Error> for ConfigurationError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

/// A platform facility an input source depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Discrete orientation token API.
    ScreenOrientation,
    /// Continuous tilt sensor API.
    Motion,
    /// User consent for reading the tilt sensor.
    MotionConsent,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ScreenOrientation => "screen_orientation",
            Self::Motion => "motion",
            Self::MotionConsent => "motion_consent",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source could not be activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("capability unavailable: {capability}")]
pub struct CapabilityUnavailable {
    pub capability: Capability,
}

impl CapabilityUnavailable {
    pub fn new(capability: Capability) -> Self {
        Self { capability }
    }
}
