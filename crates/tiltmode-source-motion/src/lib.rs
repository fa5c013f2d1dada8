//! tiltmode-source-motion: tilt sensor samples as candidates.
//! Angle classification with a dead zone, the one-time consent gate, and a
//! cancellable sample subscription.

pub mod classify;
pub mod consent;
pub mod sample;
pub mod source;
pub mod subscription;

pub use classify::classify_tilt;
pub use consent::{ConsentDecision, ConsentGrant, ConsentRequirement, MotionGate};
pub use sample::TiltSample;
pub use source::MotionSource;
pub use subscription::{DeliveryError, MotionFeed, MotionSubscription};
