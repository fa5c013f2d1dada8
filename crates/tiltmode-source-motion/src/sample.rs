use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Front/back tilt range (degrees).
pub const BETA_RANGE: (f64, f64) = (-180.0, 180.0);

/// Left/right tilt range (degrees).
pub const GAMMA_RANGE: (f64, f64) = (-90.0, 90.0);

/// One tilt reading. Angles are clamped into range on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TiltSample {
    /// Front/back tilt, 0 = upright, ±180 = upside down.
    pub beta: f64,
    /// Left/right roll.
    pub gamma: f64,
    pub captured_at: DateTime<Utc>,
}

impl TiltSample {
    pub fn new(beta: f64, gamma: f64, captured_at: DateTime<Utc>) -> Self {
        Self {
            beta: clamp(beta, BETA_RANGE),
            gamma: clamp(gamma, GAMMA_RANGE),
            captured_at,
        }
    }

    /// False when either angle is NaN; such samples never classify.
    pub fn is_finite(&self) -> bool {
        !self.beta.is_nan() && !self.gamma.is_nan()
    }
}

/// NaN passes through unchanged; infinities clamp to the bounds.
fn clamp(value: f64, (lo, hi): (f64, f64)) -> f64 {
    if value.is_nan() {
        value
    } else {
        value.clamp(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_values_are_kept() {
        let s = TiltSample::new(-120.5, 33.0, Utc::now());
        assert_eq!(s.beta, -120.5);
        assert_eq!(s.gamma, 33.0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let s = TiltSample::new(270.0, -135.0, Utc::now());
        assert_eq!(s.beta, 180.0);
        assert_eq!(s.gamma, -90.0);

        let s = TiltSample::new(f64::NEG_INFINITY, f64::INFINITY, Utc::now());
        assert_eq!(s.beta, -180.0);
        assert_eq!(s.gamma, 90.0);
    }

    #[test]
    fn nan_is_not_finite() {
        assert!(!TiltSample::new(f64::NAN, 0.0, Utc::now()).is_finite());
        assert!(!TiltSample::new(0.0, f64::NAN, Utc::now()).is_finite());
        assert!(TiltSample::new(0.0, 0.0, Utc::now()).is_finite());
    }
}
