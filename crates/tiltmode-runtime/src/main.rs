//! tiltmode: orientation-to-mode runtime binary.
//! Reads orientation events, resolves them into a stable mode, and prints
//! each mode change on stdout.

use anyhow::Context;
use clap::Parser;
use tiltmode_core::{ModeResolver, ResolverDriver};

mod cli;
mod cmd_classify;
mod cmd_replay;
mod config;
mod engine;
mod init;
mod input;
mod run_loop;
mod sinks;

use config::FileConfig;
use engine::Engine;
use init::{Capabilities, Sources};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    let filter = std::env::var("TILTMODE_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let file_config = FileConfig::load(args.config.as_deref())?;

    match args.command {
        cli::Command::Run(opts) => {
            let config = file_config.with_overrides(&opts.sources, opts.tick_interval_ms)?;
            let engine = build_engine(&config, &opts.sources, args.format)?;
            tracing::info!(
                stable_window_ms = config.resolver.stable_window_ms,
                tick_interval_ms = config.runtime.tick_interval_ms,
                "tiltmode starting"
            );
            let shutdown = run_loop::shutdown_signal();
            match opts.input {
                Some(path) => {
                    let file = tokio::fs::File::open(&path)
                        .await
                        .with_context(|| format!("opening input {}", path.display()))?;
                    let reader = tokio::io::BufReader::new(file);
                    run_loop::run_loop(engine, reader, config.runtime, shutdown).await?;
                }
                None => {
                    let reader = tokio::io::BufReader::new(tokio::io::stdin());
                    run_loop::run_loop(engine, reader, config.runtime, shutdown).await?;
                }
            }
        }
        cli::Command::Replay(opts) => {
            let config = file_config.with_overrides(&opts.sources, None)?;
            let engine = build_engine(&config, &opts.sources, args.format)?;
            cmd_replay::cmd_replay(engine, &opts.file)?;
        }
        cli::Command::Classify(opts) => {
            cmd_classify::cmd_classify(&opts, args.format)?;
        }
    }

    Ok(())
}

fn build_engine(
    config: &FileConfig,
    sources: &cli::SourceOpts,
    format: cli::OutputFormat,
) -> anyhow::Result<Engine> {
    let resolver = ModeResolver::new(config.resolver)?;
    let mut driver = ResolverDriver::new(resolver).with_sink(sinks::LineSink::stdout(format));
    if sources.debug_sink {
        driver = driver.with_sink(sinks::DebugSink::default());
    }
    tracing::debug!(sinks = driver.sink_count(), "mode sinks registered");
    let detected = Sources::detect(&Capabilities::from(sources), &config.resolver);
    Ok(Engine::new(driver, detected))
}
