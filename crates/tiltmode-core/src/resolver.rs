//! Mode resolver: turns candidates from both sources into one stable mode timeline.
//!
//! Rules:
//!
//! - **Stability window**: a proposed mode is announced only after it has been
//!   the sole proposal for `stable_window_ms`. Re-proposing the same mode does
//!   not restart the window; proposing a different mode does.
//! - **Inconclusive readings**: candidates without a mode never start or cancel
//!   a pending window.
//! - **Screen priority**: a screen reading stays authoritative for one window
//!   after it was observed. A disagreeing motion candidate inside that span is
//!   suppressed. A screen reading without a mode releases the authority.
//! - **Ordering**: candidates older than the last accepted one are dropped.
//! - **Single emission**: one call announces at most one mode, and never the
//!   mode that is already current.
//!
//! The window is evaluated when a candidate arrives and on [`ModeResolver::tick`];
//! nothing here sleeps or spawns.

use chrono::{DateTime, Utc};

use crate::config::ResolverConfig;
use crate::error::ConfigurationError;
use crate::types::{Candidate, CandidateRecord, Mode, ModeChange, SourceKind};

// ─── State ───────────────────────────────────────────────────────

/// A proposed mode being timed for stability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingCandidate {
    pub mode: Mode,
    pub since: DateTime<Utc>,
}

/// Resolver-owned mutable state.
///
/// `pending` couples the candidate with its start instant, so one is never
/// set without the other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ResolverState {
    current_mode: Option<Mode>,
    pending: Option<PendingCandidate>,
}

/// Last screen reading that carried a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScreenReading {
    mode: Mode,
    at: DateTime<Utc>,
}

/// Externally visible phase of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverPhase {
    /// No mode has been announced and nothing is pending.
    Idle,
    /// A mode is being timed for stability.
    Pending(PendingCandidate),
    /// A mode is announced and nothing competes with it.
    Settled(Mode),
}

// ─── Output ──────────────────────────────────────────────────────

/// What a single candidate did to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// No mode in the candidate; state untouched.
    Inconclusive,
    /// A new pending window was started.
    Proposed,
    /// Same mode as the pending candidate; window kept.
    Reinforced,
    /// Same mode as the settled one with nothing pending.
    Unchanged,
    /// Motion disagreed with a screen reading that is still authoritative.
    SuppressedByScreen,
    /// The candidate's source is disabled by configuration.
    SourceDisabled,
    /// Timestamp earlier than the last accepted candidate.
    ClockSkewDropped,
}

/// Result of [`ModeResolver::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub disposition: Disposition,
    /// Mode announced by this call, if any.
    pub change: Option<ModeChange>,
}

impl Observation {
    fn unchanged(disposition: Disposition) -> Self {
        Self {
            disposition,
            change: None,
        }
    }
}

// ─── Resolver ────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ModeResolver {
    config: ResolverConfig,
    state: ResolverState,
    last_screen: Option<ScreenReading>,
    last_accepted_at: Option<DateTime<Utc>>,
}

impl ModeResolver {
    /// Create a resolver in the `Idle` phase.
    pub fn new(config: ResolverConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self {
            config,
            state: ResolverState::default(),
            last_screen: None,
            last_accepted_at: None,
        })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Last announced mode. Never returns to `None` once set.
    pub fn current_mode(&self) -> Option<Mode> {
        self.state.current_mode
    }

    pub fn phase(&self) -> ResolverPhase {
        match (self.state.pending, self.state.current_mode) {
            (Some(pending), _) => ResolverPhase::Pending(pending),
            (None, Some(mode)) => ResolverPhase::Settled(mode),
            (None, None) => ResolverPhase::Idle,
        }
    }

    /// Seed from a synchronous startup read.
    ///
    /// Returns `None` without touching state once any candidate has been
    /// accepted: a startup read must not compete with live events.
    pub fn seed(&mut self, candidate: Candidate) -> Option<Observation> {
        if self.last_accepted_at.is_some() {
            return None;
        }
        Some(self.observe(candidate))
    }

    /// Feed one candidate through the state machine.
    pub fn observe(&mut self, candidate: Candidate) -> Observation {
        if !self.config.source_enabled(candidate.source) {
            return Observation::unchanged(Disposition::SourceDisabled);
        }
        if self
            .last_accepted_at
            .is_some_and(|last| candidate.observed_at < last)
        {
            return Observation::unchanged(Disposition::ClockSkewDropped);
        }

        let now = candidate.observed_at;
        self.last_accepted_at = Some(now);

        // A window that matured before this candidate arrived settles first.
        let mut change = self.settle(now);

        if candidate.source == SourceKind::Screen {
            self.last_screen = candidate.mode.map(|mode| ScreenReading { mode, at: now });
        }

        let disposition = match candidate.mode {
            None => Disposition::Inconclusive,
            Some(mode) => self.propose(mode, candidate.source, now),
        };

        // Zero-length windows settle on the proposing call.
        if change.is_none() {
            change = self.settle(now);
        }

        Observation {
            disposition,
            change,
        }
    }

    /// Validate a boundary record, then observe it.
    pub fn observe_record(
        &mut self,
        record: CandidateRecord,
    ) -> Result<Observation, ConfigurationError> {
        let candidate = Candidate::try_from(record)?;
        Ok(self.observe(candidate))
    }

    /// Periodic check: announce the pending mode once its window has elapsed.
    ///
    /// A tick earlier than the last accepted candidate is ignored. A tick
    /// that announces a mode becomes the new ordering watermark, so change
    /// timestamps never go backwards.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<ModeChange> {
        if self.last_accepted_at.is_some_and(|last| now < last) {
            return None;
        }
        let change = self.settle(now)?;
        self.last_accepted_at = Some(now);
        Some(change)
    }

    fn propose(&mut self, mode: Mode, source: SourceKind, now: DateTime<Utc>) -> Disposition {
        if source == SourceKind::Motion && self.screen_overrides(mode, now) {
            return Disposition::SuppressedByScreen;
        }

        match self.state.pending {
            Some(pending) if pending.mode == mode => Disposition::Reinforced,
            Some(_) => {
                self.start_pending(mode, now);
                Disposition::Proposed
            }
            None if self.state.current_mode == Some(mode) => Disposition::Unchanged,
            None => {
                self.start_pending(mode, now);
                Disposition::Proposed
            }
        }
    }

    fn screen_overrides(&self, motion_mode: Mode, now: DateTime<Utc>) -> bool {
        self.last_screen.is_some_and(|reading| {
            reading.mode != motion_mode
                && now.signed_duration_since(reading.at) < self.config.stable_window()
        })
    }

    fn start_pending(&mut self, mode: Mode, now: DateTime<Utc>) {
        self.state.pending = Some(PendingCandidate { mode, since: now });
    }

    fn settle(&mut self, now: DateTime<Utc>) -> Option<ModeChange> {
        let pending = self.state.pending?;
        if now.signed_duration_since(pending.since) < self.config.stable_window() {
            return None;
        }

        self.state.pending = None;
        if self.state.current_mode == Some(pending.mode) {
            return None;
        }

        let previous = self.state.current_mode.replace(pending.mode);
        Some(ModeChange {
            mode: pending.mode,
            previous,
            at: now,
        })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
