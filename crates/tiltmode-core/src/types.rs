use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigurationError;

// ─── Mode ─────────────────────────────────────────────────────────

/// The four application modes. Closed set: no "unknown" mode exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    AlarmClock,
    Stopwatch,
    Timer,
    Weather,
}

impl Mode {
    pub const ALL: [Self; 4] = [Self::AlarmClock, Self::Stopwatch, Self::Timer, Self::Weather];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AlarmClock => "alarm_clock",
            Self::Stopwatch => "stopwatch",
            Self::Timer => "timer",
            Self::Weather => "weather",
        }
    }

    /// Element id of the panel shown for this mode.
    pub fn panel_id(self) -> &'static str {
        match self {
            Self::AlarmClock => "alarm-clock",
            Self::Stopwatch => "stopwatch",
            Self::Timer => "timer",
            Self::Weather => "weather",
        }
    }

    /// Body class applied while this mode is active.
    pub fn body_class(self) -> &'static str {
        match self {
            Self::AlarmClock => "mode-alarm",
            Self::Stopwatch => "mode-stopwatch",
            Self::Timer => "mode-timer",
            Self::Weather => "mode-weather",
        }
    }

    /// Canonical platform orientation name that selects this mode.
    pub fn orientation_name(self) -> &'static str {
        match self {
            Self::AlarmClock => "portrait-primary",
            Self::Stopwatch => "landscape-primary",
            Self::Timer => "portrait-secondary",
            Self::Weather => "landscape-secondary",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ConfigurationError;

    /// Accepts the wire name or the panel id, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alarm_clock" | "alarm-clock" => Ok(Self::AlarmClock),
            "stopwatch" => Ok(Self::Stopwatch),
            "timer" => Ok(Self::Timer),
            "weather" => Ok(Self::Weather),
            _ => Err(ConfigurationError::UnknownMode(s.to_owned())),
        }
    }
}

// ─── Source ───────────────────────────────────────────────────────

/// Which input produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Screen,
    Motion,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Screen => "screen",
            Self::Motion => "motion",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Candidate ────────────────────────────────────────────────────

/// One classified observation from a single source.
///
/// `mode == None` means the observation did not confidently indicate any
/// mode (dead zone or unrecognized token).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub mode: Option<Mode>,
    pub source: SourceKind,
    pub observed_at: DateTime<Utc>,
}

impl Candidate {
    pub fn new(mode: Option<Mode>, source: SourceKind, observed_at: DateTime<Utc>) -> Self {
        Self {
            mode,
            source,
            observed_at,
        }
    }

    pub fn screen(mode: Option<Mode>, observed_at: DateTime<Utc>) -> Self {
        Self::new(mode, SourceKind::Screen, observed_at)
    }

    pub fn motion(mode: Option<Mode>, observed_at: DateTime<Utc>) -> Self {
        Self::new(mode, SourceKind::Motion, observed_at)
    }

    pub fn is_conclusive(&self) -> bool {
        self.mode.is_some()
    }
}

/// Untyped candidate as it arrives from an integration boundary.
///
/// The mode is still a string here; [`Candidate::try_from`] validates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub source: SourceKind,
    #[serde(default)]
    pub mode: Option<String>,
    pub observed_at: DateTime<Utc>,
}

impl TryFrom<CandidateRecord> for Candidate {
    type Error = ConfigurationError;

    fn try_from(record: CandidateRecord) -> Result<Self, Self::Error> {
        let mode = record.mode.as_deref().map(str::parse::<Mode>).transpose()?;
        Ok(Self::new(mode, record.source, record.observed_at))
    }
}

// ─── Mode Change ──────────────────────────────────────────────────

/// Notification emitted when a new mode settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeChange {
    pub mode: Mode,
    /// Mode that was current before this change (`None` for the first announcement).
    pub previous: Option<Mode>,
    /// Instant at which the stability window was found satisfied.
    pub at: DateTime<Utc>,
}

// ─── Tests ────────────────────────────────────────────────────────
