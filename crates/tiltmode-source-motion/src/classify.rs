//! Tilt angle classification.
//!
//! Rules are checked in a fixed order and the first match wins:
//!
//! 1. near flat, upright: `|beta| < 45` and `|gamma| < 30` → alarm clock
//! 2. near flat, inverted: beta within 45 of ±180 and `|gamma| < 30` → timer
//! 3. rolled right: `gamma > 45` → stopwatch
//! 4. rolled left: `gamma < -45` → weather
//! 5. anything else is the dead zone
//!
//! The narrow-gamma rules come first so a reading that is both mostly flat
//! and somewhat rolled resolves to the flat mode. All bounds are strict.

use tiltmode_core::Mode;

use crate::sample::TiltSample;

/// Beta tolerance around upright / inverted (degrees).
pub const BETA_TOLERANCE_DEG: f64 = 45.0;

/// Maximum roll for the portrait modes (degrees).
pub const FLAT_GAMMA_MAX_DEG: f64 = 30.0;

/// Minimum roll for the landscape modes (degrees).
pub const ROLL_GAMMA_MIN_DEG: f64 = 45.0;

/// Classify one sample. Total: returns `None` for the dead zone and for NaN.
pub fn classify_tilt(sample: &TiltSample) -> Option<Mode> {
    if !sample.is_finite() {
        return None;
    }
    let TiltSample { beta, gamma, .. } = *sample;
    let flat = gamma.abs() < FLAT_GAMMA_MAX_DEG;

    if flat && beta.abs() < BETA_TOLERANCE_DEG {
        Some(Mode::AlarmClock)
    } else if flat
        && ((beta - 180.0).abs() < BETA_TOLERANCE_DEG || (beta + 180.0).abs() < BETA_TOLERANCE_DEG)
    {
        Some(Mode::Timer)
    } else if gamma > ROLL_GAMMA_MIN_DEG {
        Some(Mode::Stopwatch)
    } else if gamma < -ROLL_GAMMA_MIN_DEG {
        Some(Mode::Weather)
    } else {
        None
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    proptest! {
        /// Portrait modes only ever come out of the narrow gamma band.
        #[test]
        fn portrait_requires_flat_gamma(beta in -400.0f64..400.0, gamma in -200.0f64..200.0) {
            let sample = TiltSample::new(beta, gamma, Utc::now());
            if let Some(Mode::AlarmClock | Mode::Timer) = classify_tilt(&sample) {
                prop_assert!(sample.gamma.abs() < FLAT_GAMMA_MAX_DEG);
            }
        }

        /// Landscape modes only come out of a strong roll, on the matching side.
        #[test]
        fn landscape_requires_roll(beta in -180.0f64..=180.0, gamma in -90.0f64..=90.0) {
            let sample = TiltSample::new(beta, gamma, Utc::now());
            match classify_tilt(&sample) {
                Some(Mode::Stopwatch) => prop_assert!(gamma > ROLL_GAMMA_MIN_DEG),
                Some(Mode::Weather) => prop_assert!(gamma < -ROLL_GAMMA_MIN_DEG),
                _ => {}
            }
        }
    }
}
