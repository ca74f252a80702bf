//! Countdown engine
//!
//! The engine is a long-lived background task that exclusively owns the
//! countdown state. Commands arrive on an unbounded channel and are applied
//! in the same select loop that drives the one-second tick cadence, so state
//! transitions are atomic with respect to concurrent ticks without any
//! caller-visible locking.

pub mod attachment;

pub use attachment::{Attachment, AttachmentManager, Tick};

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::state::{CountdownState, PauseToggle};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Commands accepted by the engine task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Start(u64),
    TogglePause,
}

/// Errors reported synchronously at the command boundary.
///
/// The engine has no downstream dependency that can fail; the only errors are
/// local validation of the caller's input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("countdown must start from a positive number of seconds (got {0})")]
    InvalidInitial(u64),
    #[error("countdown engine is no longer running")]
    EngineGone,
}

/// Cloneable command endpoint bound to one engine task
#[derive(Debug, Clone)]
pub struct EngineHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl EngineHandle {
    /// Begin a countdown from `initial` seconds, discarding any run in flight.
    ///
    /// `initial == 0` is rejected here, before the command is ever queued, so
    /// the engine state is guaranteed unchanged.
    pub fn start(&self, initial: u64) -> Result<(), CommandError> {
        if initial == 0 {
            return Err(CommandError::InvalidInitial(initial));
        }
        self.commands
            .send(Command::Start(initial))
            .map_err(|_| CommandError::EngineGone)
    }

    /// Toggle between Running and Paused.
    ///
    /// Fire-and-forget: issued while Idle or Completed the engine ignores it,
    /// and a torn-down engine swallows it. Neither case is an error.
    pub fn toggle_pause(&self) {
        let _ = self.commands.send(Command::TogglePause);
    }
}

/// Spawn the engine task and return its command handle.
///
/// The task lives until process exit (or until every handle is dropped);
/// detaching observers never stops it.
pub fn spawn(attachments: Arc<AttachmentManager>) -> EngineHandle {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(engine_task(attachments, rx));
    EngineHandle { commands: tx }
}

/// One full second from now, repeating
fn cadence() -> Interval {
    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn engine_task(
    attachments: Arc<AttachmentManager>,
    mut commands: mpsc::UnboundedReceiver<Command>,
) {
    info!("countdown engine started");

    let mut countdown = CountdownState::new();
    // Present exactly while the countdown is running
    let mut ticker: Option<Interval> = None;

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    // every handle dropped, nothing can reach us anymore
                    break;
                };
                match command {
                    Command::Start(initial) => match countdown.start(initial) {
                        Ok(()) => {
                            info!(initial, "countdown started");
                            ticker = Some(cadence());
                            attachments.publish(countdown.clone());
                        }
                        // handles validate before queueing, but the state
                        // machine stays authoritative
                        Err(e) => warn!("rejected start command: {}", e),
                    },
                    Command::TogglePause => match countdown.toggle_pause() {
                        PauseToggle::Paused => {
                            info!(remaining = countdown.remaining(), "countdown paused");
                            ticker = None;
                            attachments.publish(countdown.clone());
                        }
                        PauseToggle::Resumed => {
                            info!(remaining = countdown.remaining(), "countdown resumed");
                            ticker = Some(cadence());
                            attachments.publish(countdown.clone());
                        }
                        PauseToggle::Ignored => {
                            debug!(phase = ?countdown.phase(), "pause toggle ignored");
                        }
                    },
                }
            }

            _ = next_tick(&mut ticker) => {
                if let Some(remaining) = countdown.tick() {
                    attachments.publish(countdown.clone());
                    attachments.deliver(Tick { remaining });
                    if !countdown.is_running() {
                        info!("countdown completed");
                        ticker = None;
                    }
                }
            }
        }
    }

    info!("countdown engine stopped");
}
