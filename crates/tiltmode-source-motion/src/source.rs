use tiltmode_core::Candidate;

use crate::classify::classify_tilt;
use crate::consent::ConsentGrant;
use crate::sample::TiltSample;
use crate::subscription::{MotionFeed, MotionSubscription};

/// Tilt sensor source. Constructing one requires a [`ConsentGrant`].
#[derive(Debug, Clone)]
pub struct MotionSource {
    _grant: ConsentGrant,
}

impl MotionSource {
    pub fn new(grant: ConsentGrant) -> Self {
        Self { _grant: grant }
    }

    /// Classify a single sample into a motion candidate.
    pub fn classify(&self, sample: &TiltSample) -> Candidate {
        Candidate::motion(classify_tilt(sample), sample.captured_at)
    }

    /// Open a sample subscription with a bounded buffer of `capacity` samples.
    pub fn subscribe(&self, capacity: usize) -> (MotionFeed, MotionSubscription) {
        MotionSubscription::channel(capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consent::{ConsentDecision, ConsentRequirement, MotionGate};
    use chrono::{TimeZone, Utc};
    use tiltmode_core::{Mode, SourceKind};

    fn granted() -> MotionSource {
        let mut gate = MotionGate::new(ConsentRequirement::Required);
        let grant = gate
            .request_consent(ConsentDecision::Granted)
            .expect("granted");
        MotionSource::new(grant)
    }

    #[test]
    fn classify_tags_motion_and_keeps_timestamp() {
        let at = Utc
            .with_ymd_and_hms(2026, 3, 1, 8, 0, 5)
            .single()
            .expect("valid datetime");
        let candidate = granted().classify(&TiltSample::new(170.0, 5.0, at));
        assert_eq!(candidate.mode, Some(Mode::Timer));
        assert_eq!(candidate.source, SourceKind::Motion);
        assert_eq!(candidate.observed_at, at);
    }

    #[test]
    fn dead_zone_sample_is_inconclusive() {
        let candidate = granted().classify(&TiltSample::new(90.0, 0.0, Utc::now()));
        assert!(!candidate.is_conclusive());
    }

    #[tokio::test]
    async fn subscribe_delivers_candidates() {
        let source = granted();
        let (feed, mut sub) = source.subscribe(4);
        feed.deliver(TiltSample::new(0.0, 70.0, Utc::now()))
            .expect("deliver");
        let candidate = sub.next_candidate().await.expect("candidate");
        assert_eq!(candidate.mode, Some(Mode::Stopwatch));
    }
}
