//! Platform orientation token parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use tiltmode_core::Mode;

/// Classified platform orientation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RawOrientationToken {
    PortraitPrimary,
    PortraitSecondary,
    LandscapePrimary,
    LandscapeSecondary,
    Unrecognized,
}

impl RawOrientationToken {
    /// Recognized tokens, in matching order.
    const KNOWN: [Self; 4] = [
        Self::PortraitPrimary,
        Self::PortraitSecondary,
        Self::LandscapePrimary,
        Self::LandscapeSecondary,
    ];

    /// Classify any platform string. Never fails.
    ///
    /// Matching is case-insensitive and by containment, so decorated values
    /// such as `"PORTRAIT-PRIMARY"` or `"landscape-secondary "` still match.
    pub fn parse(raw: &str) -> Self {
        let lowered = raw.to_ascii_lowercase();
        Self::KNOWN
            .into_iter()
            .find(|token| lowered.contains(token.as_str()))
            .unwrap_or(Self::Unrecognized)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PortraitPrimary => "portrait-primary",
            Self::PortraitSecondary => "portrait-secondary",
            Self::LandscapePrimary => "landscape-primary",
            Self::LandscapeSecondary => "landscape-secondary",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Mode selected by this orientation, if any.
    pub fn mode(self) -> Option<Mode> {
        match self {
            Self::PortraitPrimary => Some(Mode::AlarmClock),
            Self::LandscapePrimary => Some(Mode::Stopwatch),
            Self::PortraitSecondary => Some(Mode::Timer),
            Self::LandscapeSecondary => Some(Mode::Weather),
            Self::Unrecognized => None,
        }
    }
}

impl fmt::Display for RawOrientationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for RawOrientationToken {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any string classifies without panicking.
        #[test]
        fn parse_is_total(raw in ".*") {
            let token = RawOrientationToken::parse(&raw);
            if token == RawOrientationToken::Unrecognized {
                prop_assert!(token.mode().is_none());
            } else {
                prop_assert!(token.mode().is_some());
            }
        }
    }
}
