//! Mode-change sinks: the stdout line writer and the tracing debug sink.

use std::io::Write;

use serde::Serialize;
use tiltmode_core::{ModeChange, ModeSink};

use crate::cli::OutputFormat;

#[derive(Serialize)]
struct ChangeLine<'a> {
    mode: &'a str,
    previous: Option<&'a str>,
    at: chrono::DateTime<chrono::Utc>,
}

/// Render one change in the selected output format.
pub fn format_change(change: &ModeChange, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            let line = ChangeLine {
                mode: change.mode.as_str(),
                previous: change.previous.map(|m| m.as_str()),
                at: change.at,
            };
            // Only &str and DateTime fields: serialization cannot fail.
            serde_json::to_string(&line).unwrap_or_default()
        }
        OutputFormat::Text => format!(
            "mode: {} ({})",
            change.mode.orientation_name(),
            change.mode.as_str()
        ),
    }
}

/// Writes one line per change. Generic over the writer so tests can capture output.
pub struct LineSink<W> {
    out: W,
    format: OutputFormat,
}

impl LineSink<std::io::Stdout> {
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(std::io::stdout(), format)
    }
}

impl<W: Write> LineSink<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }
}

impl<W: Write + Send> ModeSink for LineSink<W> {
    fn mode_changed(&mut self, change: &ModeChange) {
        let line = format_change(change, self.format);
        if let Err(e) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
            tracing::warn!("failed to write mode change: {e}");
        }
    }
}

/// Logs every change at debug level, numbered from 1.
#[derive(Debug, Default)]
pub struct DebugSink {
    logged: u64,
}

impl DebugSink {
    /// Changes logged so far.
    pub fn logged(&self) -> u64 {
        self.logged
    }
}

impl ModeSink for DebugSink {
    fn mode_changed(&mut self, change: &ModeChange) {
        self.logged += 1;
        tracing::debug!(
            seq = self.logged,
            mode = change.mode.as_str(),
            previous = change.previous.map(|m| m.as_str()).unwrap_or("none"),
            panel = change.mode.panel_id(),
            body_class = change.mode.body_class(),
            at = %change.at,
            "mode changed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::{Arc, Mutex};
    use tiltmode_core::Mode;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0)
            .single()
            .expect("valid datetime")
    }

    fn change(mode: Mode, previous: Option<Mode>) -> ModeChange {
        ModeChange {
            mode,
            previous,
            at: t0(),
        }
    }

    /// Writer handle that shares its buffer with the test.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().expect("lock").clone()).expect("utf8")
        }
    }

    #[test]
    fn json_line_shape() {
        let line = format_change(&change(Mode::Timer, Some(Mode::AlarmClock)), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&line).expect("json");
        assert_eq!(value["mode"], "timer");
        assert_eq!(value["previous"], "alarm_clock");
        assert_eq!(value["at"], "2026-03-01T08:00:00Z");
    }

    #[test]
    fn json_first_change_has_null_previous() {
        let line = format_change(&change(Mode::Weather, None), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&line).expect("json");
        assert!(value["previous"].is_null());
    }

    #[test]
    fn text_line_shape() {
        let line = format_change(&change(Mode::Timer, None), OutputFormat::Text);
        assert_eq!(line, "mode: portrait-secondary (timer)");
    }

    #[test]
    fn line_sink_writes_one_line_per_change() {
        let buf = SharedBuf::default();
        let mut sink = LineSink::new(buf.clone(), OutputFormat::Text);
        sink.mode_changed(&change(Mode::Stopwatch, None));
        sink.mode_changed(&change(Mode::Weather, Some(Mode::Stopwatch)));
        assert_eq!(
            buf.contents(),
            "mode: landscape-primary (stopwatch)\nmode: landscape-secondary (weather)\n"
        );
    }

    #[test]
    fn debug_sink_counts_logged_changes() {
        let mut sink = DebugSink::default();
        assert_eq!(sink.logged(), 0);
        sink.mode_changed(&change(Mode::AlarmClock, None));
        sink.mode_changed(&change(Mode::Timer, Some(Mode::AlarmClock)));
        assert_eq!(sink.logged(), 2);
    }
}
