//! Cancellable tilt sample subscription.
//!
//! The platform side holds a [`MotionFeed`] and pushes samples as they
//! arrive; the consumer side drains a [`MotionSubscription`]. Once cancelled,
//! undelivered samples are discarded, the feed refuses new ones, and the
//! subscription yields `None` forever. A fresh subscription is needed to
//! resume.

use thiserror::Error;
use tiltmode_core::Candidate;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

use crate::classify::classify_tilt;
use crate::sample::TiltSample;

/// Why a sample was not delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("subscription cancelled")]
    Cancelled,

    #[error("subscription buffer full, sample dropped")]
    Full,
}

/// Producer half, owned by the platform adapter.
#[derive(Debug, Clone)]
pub struct MotionFeed {
    tx: mpsc::Sender<TiltSample>,
    cancel: CancellationToken,
}

impl MotionFeed {
    /// Push one sample without waiting.
    pub fn deliver(&self, sample: TiltSample) -> Result<(), DeliveryError> {
        if self.cancel.is_cancelled() {
            return Err(DeliveryError::Cancelled);
        }
        match self.tx.try_send(sample) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(DeliveryError::Full),
            Err(TrySendError::Closed(_)) => Err(DeliveryError::Cancelled),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Consumer half. Dropping it cancels the subscription.
#[derive(Debug)]
pub struct MotionSubscription {
    rx: mpsc::Receiver<TiltSample>,
    cancel: CancellationToken,
}

impl MotionSubscription {
    pub(crate) fn channel(capacity: usize) -> (MotionFeed, Self) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let cancel = CancellationToken::new();
        let feed = MotionFeed {
            tx,
            cancel: cancel.clone(),
        };
        (feed, Self { rx, cancel })
    }

    /// Token that cancels this subscription from elsewhere (e.g. a shutdown path).
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stop the subscription and discard anything not yet received.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        self.discard_pending();
    }

    /// Next raw sample; `None` once cancelled or once every feed is gone.
    pub async fn next_sample(&mut self) -> Option<TiltSample> {
        if self.cancel.is_cancelled() {
            self.discard_pending();
            return None;
        }
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                self.discard_pending();
                None
            }
            sample = self.rx.recv() => sample,
        }
    }

    /// Next sample, classified.
    pub async fn next_candidate(&mut self) -> Option<Candidate> {
        let sample = self.next_sample().await?;
        Some(classified(&sample))
    }

    /// Already buffered sample, without waiting.
    pub fn try_next_sample(&mut self) -> Option<TiltSample> {
        if self.cancel.is_cancelled() {
            self.discard_pending();
            return None;
        }
        self.rx.try_recv().ok()
    }

    /// Every buffered sample, classified, in delivery order.
    pub fn drain_candidates(&mut self) -> Vec<Candidate> {
        std::iter::from_fn(|| self.try_next_sample())
            .map(|sample| classified(&sample))
            .collect()
    }

    fn discard_pending(&mut self) {
        self.rx.close();
        while self.rx.try_recv().is_ok() {}
    }
}

fn classified(sample: &TiltSample) -> Candidate {
    Candidate::motion(classify_tilt(sample), sample.captured_at)
}

impl Drop for MotionSubscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
