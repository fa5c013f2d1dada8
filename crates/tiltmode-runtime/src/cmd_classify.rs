//! `tiltmode classify`: one-shot classification of a token or a tilt reading.

use chrono::Utc;
use serde_json::json;
use tiltmode_core::{Mode, SourceKind};
use tiltmode_source_motion::{TiltSample, classify_tilt};
use tiltmode_source_screen::RawOrientationToken;

use crate::cli::{ClassifyOpts, OutputFormat};

pub fn cmd_classify(opts: &ClassifyOpts, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", classify_line(opts, format)?);
    Ok(())
}

pub fn classify_line(opts: &ClassifyOpts, format: OutputFormat) -> anyhow::Result<String> {
    let (source, input, mode) = match (&opts.token, opts.beta, opts.gamma) {
        (Some(token), _, _) => {
            let parsed = RawOrientationToken::parse(token);
            (SourceKind::Screen, json!(parsed.as_str()), parsed.mode())
        }
        (None, Some(beta), Some(gamma)) => {
            let sample = TiltSample::new(beta, gamma, Utc::now());
            (
                SourceKind::Motion,
                json!({ "beta": sample.beta, "gamma": sample.gamma }),
                classify_tilt(&sample),
            )
        }
        _ => anyhow::bail!("classify needs --token or both --beta and --gamma"),
    };

    Ok(match format {
        OutputFormat::Json => json!({
            "source": source.as_str(),
            "input": input,
            "mode": mode.map(Mode::as_str),
        })
        .to_string(),
        OutputFormat::Text => match mode {
            Some(mode) => format!("{source}: {} ({})", mode.orientation_name(), mode.as_str()),
            None => format!("{source}: none"),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(t: &str) -> ClassifyOpts {
        ClassifyOpts {
            token: Some(t.into()),
            beta: None,
            gamma: None,
        }
    }

    fn tilt(beta: f64, gamma: f64) -> ClassifyOpts {
        ClassifyOpts {
            token: None,
            beta: Some(beta),
            gamma: Some(gamma),
        }
    }

    #[test]
    fn token_text() {
        let line = classify_line(&token("Landscape-Secondary"), OutputFormat::Text).expect("ok");
        assert_eq!(line, "screen: landscape-secondary (weather)");
    }

    #[test]
    fn unrecognized_token_json() {
        let line = classify_line(&token("sideways"), OutputFormat::Json).expect("ok");
        let value: serde_json::Value = serde_json::from_str(&line).expect("json");
        assert_eq!(value["source"], "screen");
        assert!(value["mode"].is_null());
    }

    #[test]
    fn tilt_text_and_dead_zone() {
        assert_eq!(
            classify_line(&tilt(-170.0, 5.0), OutputFormat::Text).expect("ok"),
            "motion: portrait-secondary (timer)"
        );
        assert_eq!(
            classify_line(&tilt(45.0, 0.0), OutputFormat::Text).expect("ok"),
            "motion: none"
        );
    }

    #[test]
    fn tilt_json_reports_clamped_input() {
        let line = classify_line(&tilt(0.0, 200.0), OutputFormat::Json).expect("ok");
        let value: serde_json::Value = serde_json::from_str(&line).expect("json");
        assert_eq!(value["input"]["gamma"], 90.0);
        assert_eq!(value["mode"], "stopwatch");
    }

    #[test]
    fn missing_input_is_an_error() {
        let opts = ClassifyOpts {
            token: None,
            beta: Some(1.0),
            gamma: None,
        };
        assert!(classify_line(&opts, OutputFormat::Json).is_err());
    }
}
