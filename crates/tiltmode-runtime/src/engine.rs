//! Event handling shared by `run` and `replay`.
//!
//! The engine is the single owner of the resolver driver. Every event is
//! applied to completion before the next one is looked at.

use chrono::{DateTime, Utc};
use tiltmode_core::{
    Candidate, CandidateRecord, ConfigurationError, Disposition, ModeChange, Observation,
    ResolverDriver,
};
use tiltmode_source_motion::{MotionSource, TiltSample};
use tiltmode_source_screen::StaticOrientation;

use crate::init::Sources;
use crate::input::InputEvent;

type ScreenSource = tiltmode_source_screen::ScreenOrientationSource<StaticOrientation>;

pub struct Engine {
    driver: ResolverDriver,
    sources: Sources,
}

impl Engine {
    pub fn new(driver: ResolverDriver, sources: Sources) -> Self {
        Self { driver, sources }
    }

    pub fn driver(&self) -> &ResolverDriver {
        &self.driver
    }

    pub fn motion(&self) -> Option<&MotionSource> {
        self.sources.motion.as_ref()
    }

    /// Seed from the screen source's synchronous read, if it has one.
    pub fn seed(&mut self, now: DateTime<Utc>) -> Option<ModeChange> {
        let candidate = self.screen()?.poll_current(now)?;
        tracing::debug!(mode = ?candidate.mode, "seeding from initial orientation");
        let observation = self.driver.seed(candidate)?;
        log_observation(&candidate, &observation);
        observation.change
    }

    /// Apply one input event. `Motion` events are classified inline here;
    /// the live loop routes them through the subscription instead.
    ///
    /// Events must carry a timestamp (see [`InputEvent::stamped`]); unstamped
    /// ones are skipped.
    pub fn handle(&mut self, event: InputEvent) -> Result<Option<ModeChange>, ConfigurationError> {
        let kind = event.kind();
        match event {
            InputEvent::Consent { granted } => {
                self.consent(granted);
                Ok(None)
            }
            InputEvent::Tick { at: Some(at) } => Ok(self.tick(at)),
            InputEvent::Screen {
                token,
                at: Some(at),
            } => {
                let Some(screen) = self.screen() else {
                    tracing::debug!("screen event ignored: screen orientation unavailable");
                    return Ok(None);
                };
                let candidate = screen.on_change(&token, at);
                Ok(self.observe(candidate))
            }
            InputEvent::Motion {
                beta,
                gamma,
                at: Some(at),
            } => {
                let Some(motion) = self.motion() else {
                    tracing::debug!("motion event ignored: motion source inactive");
                    return Ok(None);
                };
                let candidate = motion.classify(&TiltSample::new(beta, gamma, at));
                Ok(self.observe(candidate))
            }
            InputEvent::Candidate {
                source,
                mode,
                at: Some(at),
            } => {
                let record = CandidateRecord {
                    source,
                    mode,
                    observed_at: at,
                };
                let candidate = Candidate::try_from(record)?;
                Ok(self.observe(candidate))
            }
            InputEvent::Tick { at: None }
            | InputEvent::Screen { at: None, .. }
            | InputEvent::Motion { at: None, .. }
            | InputEvent::Candidate { at: None, .. } => {
                tracing::warn!("{kind} event without timestamp skipped");
                Ok(None)
            }
        }
    }

    /// Record a consent answer. Returns true if motion became active.
    pub fn consent(&mut self, granted: bool) -> bool {
        self.sources.consent(granted).is_some()
    }

    pub fn observe(&mut self, candidate: Candidate) -> Option<ModeChange> {
        let observation = self.driver.observe(candidate);
        log_observation(&candidate, &observation);
        observation.change
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<ModeChange> {
        let change = self.driver.tick(now);
        if let Some(change) = &change {
            tracing::info!(mode = change.mode.as_str(), "mode settled on tick");
        }
        change
    }

    fn screen(&self) -> Option<&ScreenSource> {
        self.sources.screen.as_ref()
    }
}

fn log_observation(candidate: &Candidate, observation: &Observation) {
    let source = candidate.source.as_str();
    let mode = candidate.mode.map(|m| m.as_str()).unwrap_or("none");
    match observation.disposition {
        Disposition::ClockSkewDropped => {
            tracing::debug!(source, mode, at = %candidate.observed_at, "out-of-order candidate dropped");
        }
        Disposition::SuppressedByScreen => {
            tracing::debug!(source, mode, "motion candidate suppressed by screen reading");
        }
        Disposition::SourceDisabled => {
            tracing::trace!(source, "candidate from disabled source ignored");
        }
        Disposition::Proposed => tracing::debug!(source, mode, "candidate proposed"),
        Disposition::Inconclusive | Disposition::Reinforced | Disposition::Unchanged => {
            tracing::trace!(source, mode, disposition = ?observation.disposition, "candidate observed");
        }
    }
    if let Some(change) = &observation.change {
        tracing::info!(
            mode = change.mode.as_str(),
            previous = change.previous.map(|m| m.as_str()).unwrap_or("none"),
            "mode settled"
        );
    }
}
