//! Observer attachment tracking and tick delivery

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::debug;

use crate::state::CountdownState;

/// One countdown reading, delivered at most once per elapsed second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub remaining: u64,
}

/// Notification handle held by the currently attached observer.
///
/// Carries the countdown state captured at attach time, so the observer can
/// paint immediately instead of waiting for the next tick, plus the receiving
/// end of the delivery channel. Once superseded by a newer attachment the
/// handle is inert: `next_tick` resolves `None` and detaching it is a no-op.
#[derive(Debug)]
pub struct Attachment {
    generation: u64,
    ticks: watch::Receiver<Tick>,
    initial: CountdownState,
}

impl Attachment {
    /// Countdown state as of the moment this observer attached
    pub fn initial_state(&self) -> &CountdownState {
        &self.initial
    }

    /// Wait for the next tick.
    ///
    /// Only the latest undelivered tick is retained: a slow observer sees the
    /// most recent value, never a backlog. Returns `None` once this
    /// attachment has been superseded or detached.
    pub async fn next_tick(&mut self) -> Option<Tick> {
        self.ticks.changed().await.ok()?;
        Some(*self.ticks.borrow_and_update())
    }
}

#[derive(Debug)]
struct Inner {
    generation: u64,
    delivery: Option<watch::Sender<Tick>>,
    latest: CountdownState,
}

/// Tracks the at-most-one live observer and owns the delivery path to it.
///
/// The engine pushes every tick through `deliver`; with no observer attached
/// the tick is dropped on the floor, which is expected steady-state behavior,
/// not an error. Attaching never touches engine state.
#[derive(Debug)]
pub struct AttachmentManager {
    inner: Mutex<Inner>,
}

impl AttachmentManager {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                generation: 0,
                delivery: None,
                latest: CountdownState::new(),
            }),
        }
    }

    // The lock guards a plain value copy, so a poisoned guard still holds a
    // coherent snapshot and can be recovered.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attach a new observer, superseding any prior one.
    ///
    /// The prior observer's delivery channel is closed; only the most recent
    /// attachment receives ticks from here on.
    pub fn attach(&self) -> Attachment {
        let mut inner = self.lock();
        inner.generation += 1;
        let initial = inner.latest.clone();
        let (tx, rx) = watch::channel(Tick {
            remaining: initial.remaining(),
        });
        if inner.delivery.replace(tx).is_some() {
            debug!(
                generation = inner.generation,
                "new observer attached, superseding the previous one"
            );
        } else {
            debug!(generation = inner.generation, "observer attached");
        }
        Attachment {
            generation: inner.generation,
            ticks: rx,
            initial,
        }
    }

    /// Release the delivery path for `attachment`.
    ///
    /// A stale handle (already superseded by a newer attach) is a no-op. The
    /// engine keeps running either way; detaching only cancels delivery.
    pub fn detach(&self, attachment: Attachment) {
        let mut inner = self.lock();
        if attachment.generation == inner.generation {
            inner.delivery = None;
            debug!(generation = attachment.generation, "observer detached");
        } else {
            debug!(
                generation = attachment.generation,
                "stale observer handle detached, ignoring"
            );
        }
    }

    /// Countdown state as last published by the engine
    pub fn current(&self) -> CountdownState {
        self.lock().latest.clone()
    }

    /// Push one tick to the attached observer, if any.
    ///
    /// Never blocks and never queues: an unread tick is overwritten by the
    /// next one, and with no observer attached the tick is dropped.
    pub(crate) fn deliver(&self, tick: Tick) {
        let inner = self.lock();
        if let Some(tx) = &inner.delivery {
            let _ = tx.send(tick);
        }
    }

    /// Record the engine's current state for attach-time painting
    pub(crate) fn publish(&self, state: CountdownState) {
        self.lock().latest = state;
    }
}

impl Default for AttachmentManager {
    fn default() -> Self {
        Self::new()
    }
}
