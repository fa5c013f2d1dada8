//! CLI definition using clap derive.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tiltmode_source_motion::ConsentRequirement;

#[derive(Parser)]
#[command(name = "tiltmode", about = "Resolve device orientation into a display mode")]
pub struct Cli {
    /// TOML config file
    #[arg(long, short = 'c', global = true, env = "TILTMODE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output line format for mode changes
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve a live event stream (stdin or --input) against the wall clock
    Run(RunOpts),
    /// Resolve a recorded event file using only its timestamps
    Replay(ReplayOpts),
    /// Classify a single orientation token or tilt reading
    Classify(ClassifyOpts),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `{"mode":..,"previous":..,"at":..}`
    Json,
    /// `mode: portrait-secondary (timer)`
    Text,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ConsentArg {
    #[default]
    NotRequired,
    Required,
}

impl From<ConsentArg> for ConsentRequirement {
    fn from(arg: ConsentArg) -> Self {
        match arg {
            ConsentArg::NotRequired => Self::NotRequired,
            ConsentArg::Required => Self::Required,
        }
    }
}

/// Resolver overrides and platform capability description shared by `run` and `replay`.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct SourceOpts {
    /// Stability window in milliseconds (overrides config)
    #[arg(long)]
    pub stable_window_ms: Option<u64>,

    /// Ignore screen orientation candidates (overrides config)
    #[arg(long)]
    pub disable_screen_source: bool,

    /// Ignore motion candidates (overrides config)
    #[arg(long)]
    pub disable_motion_source: bool,

    /// Platform has no screen orientation API
    #[arg(long)]
    pub no_screen_api: bool,

    /// Platform has no tilt sensor API
    #[arg(long)]
    pub no_motion_api: bool,

    /// Whether the tilt sensor needs user consent
    #[arg(long, value_enum, default_value_t = ConsentArg::NotRequired)]
    pub motion_consent: ConsentArg,

    /// Orientation token reported at startup, used to seed the resolver
    #[arg(long)]
    pub initial_orientation: Option<String>,

    /// Also log every mode change through tracing
    #[arg(long)]
    pub debug_sink: bool,
}

#[derive(clap::Args)]
pub struct RunOpts {
    #[command(flatten)]
    pub sources: SourceOpts,

    /// Read events from a file instead of stdin
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Tick interval in milliseconds (overrides config)
    #[arg(long)]
    pub tick_interval_ms: Option<u64>,
}

#[derive(clap::Args)]
pub struct ReplayOpts {
    /// JSON-lines event file
    pub file: PathBuf,

    #[command(flatten)]
    pub sources: SourceOpts,
}

#[derive(clap::Args, Debug)]
pub struct ClassifyOpts {
    /// Platform orientation token, e.g. "landscape-primary"
    #[arg(long, conflicts_with_all = ["beta", "gamma"], required_unless_present = "beta")]
    pub token: Option<String>,

    /// Front/back tilt in degrees
    #[arg(long, requires = "gamma", allow_hyphen_values = true)]
    pub beta: Option<f64>,

    /// Left/right roll in degrees
    #[arg(long, requires = "beta", allow_hyphen_values = true)]
    pub gamma: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn replay_parses_file_and_flags() {
        let cli = Cli::try_parse_from([
            "tiltmode",
            "--format",
            "text",
            "replay",
            "events.jsonl",
            "--stable-window-ms",
            "250",
            "--motion-consent",
            "required",
            "--no-screen-api",
        ])
        .expect("parse");
        assert_eq!(cli.format, OutputFormat::Text);
        let Command::Replay(opts) = cli.command else {
            panic!("expected replay");
        };
        assert_eq!(opts.file, PathBuf::from("events.jsonl"));
        assert_eq!(opts.sources.stable_window_ms, Some(250));
        assert_eq!(opts.sources.motion_consent, ConsentArg::Required);
        assert!(opts.sources.no_screen_api);
        assert!(!opts.sources.no_motion_api);
    }

    #[test]
    fn classify_accepts_negative_angles() {
        let cli = Cli::try_parse_from(["tiltmode", "classify", "--beta", "-170", "--gamma", "-5"])
            .expect("parse");
        let Command::Classify(opts) = cli.command else {
            panic!("expected classify");
        };
        assert_eq!(opts.beta, Some(-170.0));
        assert_eq!(opts.gamma, Some(-5.0));
    }

    #[test]
    fn classify_rejects_token_with_angles() {
        let result = Cli::try_parse_from([
            "tiltmode",
            "classify",
            "--token",
            "portrait-primary",
            "--beta",
            "0",
            "--gamma",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn classify_requires_both_angles() {
        assert!(Cli::try_parse_from(["tiltmode", "classify", "--beta", "10"]).is_err());
        assert!(Cli::try_parse_from(["tiltmode", "classify"]).is_err());
    }

    #[test]
    fn consent_arg_maps_to_requirement() {
        assert_eq!(
            ConsentRequirement::from(ConsentArg::Required),
            ConsentRequirement::Required
        );
        assert_eq!(
            ConsentRequirement::from(ConsentArg::default()),
            ConsentRequirement::NotRequired
        );
    }
}
