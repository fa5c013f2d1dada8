//! One-time consent gate in front of the tilt sensor.
//!
//! The gate is a small state machine: `Unrequested → Granted | Denied`. The
//! first decision sticks; asking again replays it. A [`ConsentGrant`] can only
//! be obtained from a granted gate, and [`crate::MotionSource::new`] requires
//! one, so no source exists without consent.

use serde::{Deserialize, Serialize};
use tiltmode_core::{Capability, CapabilityUnavailable};

/// Whether the platform asks the user before exposing the sensor.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConsentRequirement {
    #[default]
    NotRequired,
    Required,
}

/// Answer from the external consent prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentDecision {
    Granted,
    Denied,
}

impl From<bool> for ConsentDecision {
    fn from(granted: bool) -> Self {
        if granted { Self::Granted } else { Self::Denied }
    }
}

/// Proof that sensor access was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsentGrant {
    _private: (),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    /// Sensor API missing entirely.
    NoSensor,
    Unrequested,
    Decided(ConsentDecision),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionGate {
    state: GateState,
}

impl MotionGate {
    /// Gate for a platform that has a tilt sensor.
    pub fn new(requirement: ConsentRequirement) -> Self {
        let state = match requirement {
            ConsentRequirement::NotRequired => GateState::Decided(ConsentDecision::Granted),
            ConsentRequirement::Required => GateState::Unrequested,
        };
        Self { state }
    }

    /// Gate for a platform without a tilt sensor; it never grants.
    pub fn without_sensor() -> Self {
        Self {
            state: GateState::NoSensor,
        }
    }

    /// True while a consent prompt still has to be shown.
    pub fn awaiting_consent(&self) -> bool {
        self.state == GateState::Unrequested
    }

    /// Current grant, if consent is already settled in favor.
    pub fn grant(&self) -> Result<ConsentGrant, CapabilityUnavailable> {
        match self.state {
            GateState::Decided(ConsentDecision::Granted) => Ok(ConsentGrant { _private: () }),
            GateState::Decided(ConsentDecision::Denied) | GateState::Unrequested => {
                Err(CapabilityUnavailable::new(Capability::MotionConsent))
            }
            GateState::NoSensor => Err(CapabilityUnavailable::new(Capability::Motion)),
        }
    }

    /// Record the prompt's answer. Only the first decision counts.
    pub fn request_consent(
        &mut self,
        decision: ConsentDecision,
    ) -> Result<ConsentGrant, CapabilityUnavailable> {
        if self.state == GateState::Unrequested {
            self.state = GateState::Decided(decision);
        }
        self.grant()
    }
}
