//! Screen orientation source: activation, startup read, and change notifications.

use chrono::{DateTime, Utc};
use tiltmode_core::{Candidate, Capability, CapabilityUnavailable};

use crate::token::RawOrientationToken;

/// Host access to the platform orientation facility.
pub trait OrientationPlatform {
    /// Whether the platform reports orientation at all.
    fn is_available(&self) -> bool;

    /// Synchronous read of the currently reported token, when the platform has one.
    fn current_token(&self) -> Option<String>;
}

/// Fixed platform description supplied by the host (startup flags, tests).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticOrientation {
    available: bool,
    current: Option<String>,
}

impl StaticOrientation {
    pub fn available(current: Option<String>) -> Self {
        Self {
            available: true,
            current,
        }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }
}

impl OrientationPlatform for StaticOrientation {
    fn is_available(&self) -> bool {
        self.available
    }

    fn current_token(&self) -> Option<String> {
        self.current.clone()
    }
}

/// Activated screen orientation source.
#[derive(Debug)]
pub struct ScreenOrientationSource<P> {
    platform: P,
}

impl<P: OrientationPlatform> ScreenOrientationSource<P> {
    /// Activate over a platform; fails when the platform has no orientation facility.
    pub fn activate(platform: P) -> Result<Self, CapabilityUnavailable> {
        if !platform.is_available() {
            return Err(CapabilityUnavailable::new(Capability::ScreenOrientation));
        }
        Ok(Self { platform })
    }

    /// Classify an already parsed token. Pure and total.
    pub fn classify(token: RawOrientationToken, observed_at: DateTime<Utc>) -> Candidate {
        Candidate::screen(token.mode(), observed_at)
    }

    /// Classify a change notification delivered as a raw platform string.
    pub fn on_change(&self, raw: &str, observed_at: DateTime<Utc>) -> Candidate {
        Self::classify(RawOrientationToken::parse(raw), observed_at)
    }

    /// Startup read used to seed the resolver.
    pub fn poll_current(&self, now: DateTime<Utc>) -> Option<Candidate> {
        self.platform
            .current_token()
            .map(|raw| self.on_change(&raw, now))
    }
}
