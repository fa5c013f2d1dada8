//! JSON-lines input events.
//!
//! ```text
//! {"type":"screen","token":"landscape-primary","at":"2026-03-01T08:00:00Z"}
//! {"type":"motion","beta":170.0,"gamma":4.5}
//! {"type":"consent","granted":true}
//! {"type":"tick"}
//! {"type":"candidate","source":"motion","mode":"timer"}
//! ```
//!
//! `at` is optional everywhere; `run` fills it from the wall clock.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tiltmode_core::SourceKind;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Screen orientation change notification.
    Screen {
        token: String,
        at: Option<DateTime<Utc>>,
    },
    /// Raw tilt sample.
    Motion {
        beta: f64,
        gamma: f64,
        at: Option<DateTime<Utc>>,
    },
    /// Answer to the sensor consent prompt.
    Consent { granted: bool },
    /// Clock advance without a reading.
    Tick { at: Option<DateTime<Utc>> },
    /// Pre-classified candidate from an external integration.
    Candidate {
        source: SourceKind,
        mode: Option<String>,
        at: Option<DateTime<Utc>>,
    },
}

impl InputEvent {
    /// Parse one line. Blank lines and `#` comments yield `Ok(None)`.
    pub fn parse_line(line: &str) -> Result<Option<Self>, serde_json::Error> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }
        serde_json::from_str(trimmed).map(Some)
    }

    pub fn at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Screen { at, .. }
            | Self::Motion { at, .. }
            | Self::Tick { at }
            | Self::Candidate { at, .. } => *at,
            Self::Consent { .. } => None,
        }
    }

    /// Fill a missing timestamp.
    pub fn stamped(mut self, now: DateTime<Utc>) -> Self {
        match &mut self {
            Self::Screen { at, .. }
            | Self::Motion { at, .. }
            | Self::Tick { at }
            | Self::Candidate { at, .. } => {
                at.get_or_insert(now);
            }
            Self::Consent { .. } => {}
        }
        self
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Screen { .. } => "screen",
            Self::Motion { .. } => "motion",
            Self::Consent { .. } => "consent",
            Self::Tick { .. } => "tick",
            Self::Candidate { .. } => "candidate",
        }
    }
}
