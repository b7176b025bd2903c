//! Session-scoped `applications:changed` signal.
//!
//! Any view may publish; every live subscription receives each publish at
//! most once. Subscriptions do not keep the bus alive: once the last bus
//! handle is dropped they report closure and their owners stop listening.

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

pub const APPLICATIONS_CHANGED: &str = "applications:changed";

/// Payload-free notice that the user's applications changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplicationsChanged;

#[derive(Debug, Clone)]
pub struct ApplicationsBus {
    tx: broadcast::Sender<ApplicationsChanged>,
}

impl Default for ApplicationsBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationsBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    /// Announces a change; returns how many subscriptions were notified.
    pub fn publish(&self) -> usize {
        self.tx.send(ApplicationsChanged).unwrap_or(0)
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// What a subscription saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Changed,
    /// Every bus handle is gone; no further signals will arrive.
    Closed,
}

#[derive(Debug)]
pub struct Subscription {
    rx: broadcast::Receiver<ApplicationsChanged>,
}

impl Subscription {
    pub async fn next(&mut self) -> Signal {
        Self::classify(self.rx.recv().await)
    }

    /// Blocking variant for plain threads. Must not be called from inside
    /// an async runtime.
    pub fn next_blocking(&mut self) -> Signal {
        Self::classify(self.rx.blocking_recv())
    }

    /// Non-blocking poll; `None` when nothing is pending.
    pub fn try_next(&mut self) -> Option<Signal> {
        match self.rx.try_recv() {
            Ok(ApplicationsChanged) | Err(TryRecvError::Lagged(_)) => Some(Signal::Changed),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Signal::Closed),
        }
    }

    // Missed signals collapse into one: subscribers only ever re-query.
    fn classify(received: Result<ApplicationsChanged, RecvError>) -> Signal {
        match received {
            Ok(ApplicationsChanged) | Err(RecvError::Lagged(_)) => Signal::Changed,
            Err(RecvError::Closed) => Signal::Closed,
        }
    }
}
