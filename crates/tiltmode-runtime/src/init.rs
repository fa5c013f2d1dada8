//! Startup: capability detection and source activation.
//!
//! Missing platform facilities degrade the runtime instead of failing it.
//! Each one is reported once here with `warn!`.

use tiltmode_core::{CapabilityUnavailable, ResolverConfig};
use tiltmode_source_motion::{ConsentRequirement, MotionGate, MotionSource};
use tiltmode_source_screen::{ScreenOrientationSource, StaticOrientation};

use crate::cli::SourceOpts;

/// What the host platform offers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub screen_api: bool,
    pub motion_api: bool,
    pub consent: ConsentRequirement,
    pub initial_orientation: Option<String>,
}

impl From<&SourceOpts> for Capabilities {
    fn from(opts: &SourceOpts) -> Self {
        Self {
            screen_api: !opts.no_screen_api,
            motion_api: !opts.no_motion_api,
            consent: opts.motion_consent.into(),
            initial_orientation: opts.initial_orientation.clone(),
        }
    }
}

/// Activated input sources.
#[derive(Debug)]
pub struct Sources {
    pub screen: Option<ScreenOrientationSource<StaticOrientation>>,
    pub gate: MotionGate,
    pub motion: Option<MotionSource>,
}

impl Sources {
    pub fn detect(caps: &Capabilities, config: &ResolverConfig) -> Self {
        let platform = if caps.screen_api {
            StaticOrientation::available(caps.initial_orientation.clone())
        } else {
            StaticOrientation::unavailable()
        };
        let screen = ScreenOrientationSource::activate(platform)
            .inspect_err(report_unavailable)
            .ok();

        let gate = if caps.motion_api {
            MotionGate::new(caps.consent)
        } else {
            MotionGate::without_sensor()
        };
        let motion = if gate.awaiting_consent() {
            tracing::info!("motion sensor awaiting consent");
            None
        } else {
            gate.grant()
                .inspect_err(report_unavailable)
                .ok()
                .map(MotionSource::new)
        };

        let sources = Self {
            screen,
            gate,
            motion,
        };
        sources.report_coverage(config);
        sources
    }

    /// Record the consent prompt's answer. Returns the motion source if this
    /// call activated it.
    pub fn consent(&mut self, granted: bool) -> Option<&MotionSource> {
        if self.motion.is_some() {
            return None;
        }
        match self.gate.request_consent(granted.into()) {
            Ok(grant) => {
                tracing::info!("motion sensor consent granted");
                self.motion = Some(MotionSource::new(grant));
                self.motion.as_ref()
            }
            Err(e) => {
                report_unavailable(&e);
                None
            }
        }
    }

    /// True when no source can currently deliver a reading.
    pub fn none_active(&self) -> bool {
        self.screen.is_none() && self.motion.is_none() && !self.gate.awaiting_consent()
    }

    fn report_coverage(&self, config: &ResolverConfig) {
        if self.none_active() {
            tracing::warn!("no orientation source available; mode will not resolve");
        } else if config.all_sources_disabled() {
            tracing::warn!("all sources disabled by configuration; mode will not resolve");
        }
    }
}

fn report_unavailable(e: &CapabilityUnavailable) {
    tracing::warn!("{e}; continuing without it");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiltmode_core::Mode;

    fn caps() -> Capabilities {
        Capabilities {
            screen_api: true,
            motion_api: true,
            consent: ConsentRequirement::NotRequired,
            initial_orientation: None,
        }
    }

    #[test]
    fn full_platform_activates_both() {
        let sources = Sources::detect(&caps(), &ResolverConfig::default());
        assert!(sources.screen.is_some());
        assert!(sources.motion.is_some());
        assert!(!sources.none_active());
    }

    #[test]
    fn missing_apis_degrade() {
        let caps = Capabilities {
            screen_api: false,
            motion_api: false,
            ..caps()
        };
        let sources = Sources::detect(&caps, &ResolverConfig::default());
        assert!(sources.screen.is_none());
        assert!(sources.motion.is_none());
        assert!(sources.none_active());
    }

    #[test]
    fn consent_required_defers_motion() {
        let caps = Capabilities {
            consent: ConsentRequirement::Required,
            ..caps()
        };
        let mut sources = Sources::detect(&caps, &ResolverConfig::default());
        assert!(sources.motion.is_none());
        assert!(!sources.none_active());

        assert!(sources.consent(true).is_some());
        assert!(sources.motion.is_some());
        // Already active: nothing new.
        assert!(sources.consent(true).is_none());
    }

    #[test]
    fn denied_consent_keeps_motion_off() {
        let caps = Capabilities {
            screen_api: false,
            consent: ConsentRequirement::Required,
            ..caps()
        };
        let mut sources = Sources::detect(&caps, &ResolverConfig::default());
        assert!(sources.consent(false).is_none());
        assert!(sources.consent(true).is_none());
        assert!(sources.motion.is_none());
        assert!(sources.none_active());
    }

    #[test]
    fn initial_orientation_is_readable() {
        let caps = Capabilities {
            initial_orientation: Some("landscape-secondary".into()),
            ..caps()
        };
        let sources = Sources::detect(&caps, &ResolverConfig::default());
        let screen = sources.screen.expect("screen");
        let candidate = screen
            .poll_current(chrono::Utc::now())
            .expect("initial reading");
        assert_eq!(candidate.mode, Some(Mode::Weather));
    }

    #[test]
    fn capabilities_from_flags() {
        let opts = SourceOpts {
            no_motion_api: true,
            initial_orientation: Some("portrait-primary".into()),
            ..Default::default()
        };
        let caps = Capabilities::from(&opts);
        assert!(caps.screen_api);
        assert!(!caps.motion_api);
        assert_eq!(caps.consent, ConsentRequirement::NotRequired);
        assert_eq!(caps.initial_orientation.as_deref(), Some("portrait-primary"));
    }
}
