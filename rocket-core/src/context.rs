//! Caller-imposed deadlines and cancellation.
//!
//! A [`RequestContext`] travels with one request. Remote calls are raced
//! against [`RequestContext::cancelled`]; local work consults
//! [`RequestContext::is_cancelled`] before committing anything.

use std::future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    signal: Option<watch::Receiver<bool>>,
}

/// Fires the cancellation signal of the context it was created with.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl RequestContext {
    /// No deadline, no cancellation.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Attach a fresh cancellation signal, replacing any previous one.
    pub fn with_cancel(mut self) -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        self.signal = Some(rx);
        (self, CancelHandle { tx })
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        let expired = self.deadline.is_some_and(|d| Instant::now() >= d);
        let signalled = self.signal.as_ref().is_some_and(|rx| *rx.borrow());
        expired || signalled
    }

    /// Resolves once the deadline passes or the signal fires; never resolves
    /// for a background context.
    pub async fn cancelled(&self) {
        let deadline = async {
            match self.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => future::pending::<()>().await,
            }
        };

        let signal = async {
            match &self.signal {
                Some(rx) => {
                    let mut rx = rx.clone();
                    // A dropped handle can no longer cancel.
                    let closed = rx.wait_for(|cancelled| *cancelled).await.is_err();
                    if closed {
                        future::pending::<()>().await;
                    }
                }
                None => future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = deadline => {}
            _ = signal => {}
        }
    }
}
