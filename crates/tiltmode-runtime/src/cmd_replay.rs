//! `tiltmode replay <file>`: deterministic resolution of a recorded event file.
//!
//! Only the events' own timestamps drive the resolver. Nothing reads the wall
//! clock, so the same file always yields the same changes.

use std::path::Path;

use anyhow::Context;

use crate::engine::Engine;
use crate::input::InputEvent;

pub fn cmd_replay(engine: Engine, path: &Path) -> anyhow::Result<usize> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading events {}", path.display()))?;
    let changes = replay_str(engine, &text)?;
    tracing::info!("replayed {}: {changes} mode change(s)", path.display());
    Ok(changes)
}

/// Replay JSON lines; returns the number of mode changes.
pub fn replay_str(mut engine: Engine, text: &str) -> anyhow::Result<usize> {
    let mut seeded = false;
    let mut changes = 0;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let event = match InputEvent::parse_line(line) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!("line {line_no}: skipping unparseable event: {e}");
                continue;
            }
        };

        if !seeded && let Some(at) = event.at() {
            seeded = true;
            changes += usize::from(engine.seed(at).is_some());
        }

        let change = engine
            .handle(event)
            .with_context(|| format!("line {line_no}"))?;
        changes += usize::from(change.is_some());
    }

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::{Capabilities, Sources};
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use tiltmode_core::{Mode, ModeChange, ModeResolver, ResolverConfig, ResolverDriver};
    use tiltmode_source_motion::ConsentRequirement;

    type Changes = Arc<Mutex<Vec<ModeChange>>>;

    fn engine(caps: Capabilities) -> (Engine, Changes) {
        let config = ResolverConfig::default();
        let changes: Changes = Arc::default();
        let sink = Arc::clone(&changes);
        let driver = ResolverDriver::new(ModeResolver::new(config).expect("valid"))
            .with_sink(move |c: &ModeChange| sink.lock().expect("lock").push(*c));
        (Engine::new(driver, Sources::detect(&caps, &config)), changes)
    }

    fn caps() -> Capabilities {
        Capabilities {
            screen_api: true,
            motion_api: true,
            consent: ConsentRequirement::NotRequired,
            initial_orientation: None,
        }
    }

    fn modes(changes: &Changes) -> Vec<Mode> {
        changes.lock().expect("lock").iter().map(|c| c.mode).collect()
    }

    #[test]
    fn debounce_with_explicit_ticks() {
        let (engine, changes) = engine(caps());
        let text = r#"
{"type":"motion","beta":0,"gamma":0,"at":"2026-03-01T08:00:00Z"}
{"type":"motion","beta":2,"gamma":1,"at":"2026-03-01T08:00:00.100Z"}
{"type":"tick","at":"2026-03-01T08:00:00.399Z"}
{"type":"tick","at":"2026-03-01T08:00:00.400Z"}
"#;
        assert_eq!(replay_str(engine, text).expect("replay"), 1);
        let changes = changes.lock().expect("lock");
        assert_eq!(changes[0].mode, Mode::AlarmClock);
        assert_eq!(changes[0].at.timestamp_subsec_millis(), 400);
    }

    #[test]
    fn consent_gates_motion_lines() {
        let (engine, changes) = engine(Capabilities {
            consent: ConsentRequirement::Required,
            ..caps()
        });
        let text = r#"
{"type":"motion","beta":0,"gamma":70,"at":"2026-03-01T08:00:00Z"}
{"type":"tick","at":"2026-03-01T08:00:01Z"}
{"type":"consent","granted":true}
{"type":"motion","beta":0,"gamma":70,"at":"2026-03-01T08:00:02Z"}
{"type":"tick","at":"2026-03-01T08:00:03Z"}
"#;
        assert_eq!(replay_str(engine, text).expect("replay"), 1);
        assert_eq!(modes(&changes), vec![Mode::Stopwatch]);
    }

    #[test]
    fn initial_orientation_seeds_at_first_timestamp() {
        let (engine, changes) = engine(Capabilities {
            initial_orientation: Some("landscape-secondary".into()),
            ..caps()
        });
        let text = r#"{"type":"tick","at":"2026-03-01T08:00:00.500Z"}
{"type":"tick","at":"2026-03-01T08:00:00.900Z"}"#;
        assert_eq!(replay_str(engine, text).expect("replay"), 1);
        let changes = changes.lock().expect("lock");
        assert_eq!(changes[0].mode, Mode::Weather);
        assert_eq!(changes[0].at.timestamp_subsec_millis(), 900);
    }

    #[test]
    fn unknown_candidate_mode_aborts_with_line_number() {
        let (engine, _) = engine(caps());
        let text = r#"{"type":"tick","at":"2026-03-01T08:00:00Z"}
{"type":"candidate","source":"motion","mode":"radio","at":"2026-03-01T08:00:01Z"}"#;
        let err = replay_str(engine, text).expect_err("fatal");
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn demo_file_replays() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/events/demo.jsonl");
        let (engine, changes) = engine(caps());
        let count = cmd_replay(engine, &path).expect("replay");
        assert_eq!(count, 3);
        assert_eq!(
            modes(&changes),
            vec![Mode::AlarmClock, Mode::Stopwatch, Mode::Timer]
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let (engine, _) = engine(caps());
        assert!(cmd_replay(engine, Path::new("/nonexistent/events.jsonl")).is_err());
    }
}
