//! Outbound side: mode-change sinks and the driver that feeds them.
//!
//! [`ResolverDriver`] is the only owner of a [`ModeResolver`] in a running
//! system. Each call observes and dispatches before returning, so a second
//! candidate can never interleave between a transition and its notification.

use chrono::{DateTime, Utc};

use crate::error::ConfigurationError;
use crate::resolver::{ModeResolver, Observation, ResolverPhase};
use crate::types::{Candidate, CandidateRecord, Mode, ModeChange};

/// Receiver of settled mode changes (panel switcher, debug log, ...).
pub trait ModeSink: Send {
    fn mode_changed(&mut self, change: &ModeChange);
}

impl<F> ModeSink for F
where
    F: FnMut(&ModeChange) + Send,
{
    fn mode_changed(&mut self, change: &ModeChange) {
        self(change)
    }
}

/// Resolver plus its sinks.
pub struct ResolverDriver {
    resolver: ModeResolver,
    sinks: Vec<Box<dyn ModeSink>>,
}

impl ResolverDriver {
    pub fn new(resolver: ModeResolver) -> Self {
        Self {
            resolver,
            sinks: Vec::new(),
        }
    }

    /// Register a sink. Sinks are notified in registration order.
    pub fn with_sink(mut self, sink: impl ModeSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    pub fn current_mode(&self) -> Option<Mode> {
        self.resolver.current_mode()
    }

    pub fn phase(&self) -> ResolverPhase {
        self.resolver.phase()
    }

    pub fn seed(&mut self, candidate: Candidate) -> Option<Observation> {
        let observation = self.resolver.seed(candidate)?;
        self.dispatch(observation.change.as_ref());
        Some(observation)
    }

    pub fn observe(&mut self, candidate: Candidate) -> Observation {
        let observation = self.resolver.observe(candidate);
        self.dispatch(observation.change.as_ref());
        observation
    }

    pub fn observe_record(
        &mut self,
        record: CandidateRecord,
    ) -> Result<Observation, ConfigurationError> {
        let observation = self.resolver.observe_record(record)?;
        self.dispatch(observation.change.as_ref());
        Ok(observation)
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<ModeChange> {
        let change = self.resolver.tick(now);
        self.dispatch(change.as_ref());
        change
    }

    fn dispatch(&mut self, change: Option<&ModeChange>) {
        let Some(change) = change else {
            return;
        };
        for sink in &mut self.sinks {
            sink.mode_changed(change);
        }
    }
}
