//! Live loop: wires the input reader, motion subscription and ticker into the engine.
//!
//! One task owns the [`Engine`]; everything else talks to it over channels,
//! so resolver calls are serialized. Buffered motion samples are drained into
//! the engine before any other input event is applied, so candidates reach the
//! resolver in arrival order.

use chrono::Utc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::time::{Duration, MissedTickBehavior, interval};

use tiltmode_core::Candidate;
use tiltmode_source_motion::{DeliveryError, MotionFeed, MotionSubscription, TiltSample};

use crate::config::RuntimeOptions;
use crate::engine::Engine;
use crate::input::InputEvent;

const INPUT_QUEUE: usize = 256;

/// Live motion plumbing: the feed side is written by the input reader path.
struct MotionLink {
    feed: MotionFeed,
    subscription: MotionSubscription,
}

impl MotionLink {
    fn open(engine: &Engine, capacity: usize) -> Option<Self> {
        let (feed, subscription) = engine.motion()?.subscribe(capacity);
        Some(Self { feed, subscription })
    }
}

/// Apply every already buffered motion candidate.
fn drain_motion(engine: &mut Engine, motion: &mut Option<MotionLink>) {
    let Some(link) = motion.as_mut() else {
        return;
    };
    for candidate in link.subscription.drain_candidates() {
        engine.observe(candidate);
    }
}

/// Run until `shutdown` resolves or the input ends.
pub async fn run_loop<R, S>(
    mut engine: Engine,
    input: R,
    opts: RuntimeOptions,
    shutdown: S,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    S: std::future::Future<Output = ()>,
{
    let (tx, mut rx) = mpsc::channel(INPUT_QUEUE);
    let reader = tokio::spawn(read_events(input, tx));

    let mut motion = MotionLink::open(&engine, opts.motion_capacity);
    let mut ticker = interval(Duration::from_millis(opts.tick_interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    engine.seed(Utc::now());

    tokio::pin!(shutdown);
    let result = loop {
        tokio::select! {
            () = &mut shutdown => break Ok(()),
            event = rx.recv() => {
                let Some(event) = event else {
                    drain_motion(&mut engine, &mut motion);
                    tracing::info!("input closed");
                    break Ok(());
                };
                let event = event.stamped(Utc::now());
                if let Err(e) = dispatch(&mut engine, &mut motion, event, opts.motion_capacity) {
                    break Err(e);
                }
            }
            Some(candidate) = next_motion(&mut motion) => {
                engine.observe(candidate);
            }
            _ = ticker.tick() => {
                drain_motion(&mut engine, &mut motion);
                engine.tick(Utc::now());
            }
        }
    };

    if let Some(link) = motion.as_mut() {
        link.subscription.cancel();
    }
    reader.abort();
    tracing::info!(mode = ?engine.driver().current_mode(), "tiltmode stopped");
    result
}

fn dispatch(
    engine: &mut Engine,
    motion: &mut Option<MotionLink>,
    event: InputEvent,
    capacity: usize,
) -> anyhow::Result<()> {
    match event {
        InputEvent::Motion {
            beta,
            gamma,
            at: Some(at),
        } => {
            let Some(link) = motion.as_ref() else {
                tracing::debug!("motion event ignored: motion source inactive");
                return Ok(());
            };
            match link.feed.deliver(TiltSample::new(beta, gamma, at)) {
                Ok(()) => {}
                Err(DeliveryError::Full) => tracing::debug!("motion buffer full, sample dropped"),
                Err(DeliveryError::Cancelled) => tracing::debug!("motion subscription cancelled"),
            }
            drain_motion(engine, motion);
        }
        InputEvent::Consent { granted } => {
            drain_motion(engine, motion);
            if engine.consent(granted) {
                *motion = MotionLink::open(engine, capacity);
            }
        }
        other => {
            drain_motion(engine, motion);
            engine.handle(other)?;
        }
    }
    Ok(())
}

async fn next_motion(motion: &mut Option<MotionLink>) -> Option<Candidate> {
    match motion {
        Some(link) => link.subscription.next_candidate().await,
        None => std::future::pending().await,
    }
}

/// Parse lines into events. Malformed lines are logged and skipped.
async fn read_events<R>(input: R, tx: mpsc::Sender<InputEvent>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut line_no = 0usize;
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("input read failed: {e}");
                break;
            }
        };
        line_no += 1;
        match InputEvent::parse_line(&line) {
            Ok(Some(event)) => {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("line {line_no}: skipping unparseable event: {e}"),
        }
    }
}

/// Resolves on ctrl-c or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
                    _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
                }
            }
            Err(e) => {
                tracing::warn!("failed to register SIGTERM handler: {e}");
                ctrl_c.await.ok();
                tracing::info!("received ctrl-c, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        tracing::info!("received ctrl-c, shutting down");
    }
}
