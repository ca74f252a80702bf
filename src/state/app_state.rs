//! Main application state management

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Instant,
};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::engine::{Attachment, AttachmentManager, CommandError, EngineHandle};
use crate::recovery::{RecoverySnapshot, RecoveryStore};
use crate::state::{CountdownState, Phase};

/// What a pause toggle did, from the observer's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Countdown is pausing; `persisted` is false when the snapshot write
    /// failed (the pause still happened, engine state is authoritative)
    Pausing { remaining: u64, persisted: bool },
    /// Countdown is resuming from the frozen value
    Resuming { remaining: u64 },
    /// Nothing to pause or resume; benign
    Ignored,
}

/// How attach-time recovery initialized the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryOutcome {
    /// A paused run was restored; the engine rests at `remaining`, Paused
    Resumed { remaining: u64 },
    /// No resumable run existed; a fresh countdown was started
    Fresh { initial: u64 },
}

/// Application state binding the engine, the attachment manager and the
/// recovery store together for the command edge.
///
/// All countdown semantics live in the engine; this layer implements the
/// observer-side conventions: reading the recovery snapshot once at attach
/// time and writing it on every transition into or out of Paused.
pub struct AppState {
    engine: EngineHandle,
    attachments: Arc<AttachmentManager>,
    store: Arc<dyn RecoveryStore>,
    /// Countdown length used when no paused snapshot exists
    pub default_initial: u64,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    pub fn new(
        port: u16,
        host: String,
        default_initial: u64,
        engine: EngineHandle,
        attachments: Arc<AttachmentManager>,
        store: Arc<dyn RecoveryStore>,
    ) -> Self {
        Self {
            engine,
            attachments,
            store,
            default_initial,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    /// Attach as the current observer; never resets the countdown
    pub fn attach(&self) -> Attachment {
        self.attachments.attach()
    }

    /// Release an observer's delivery path; the engine keeps running
    pub fn detach(&self, attachment: Attachment) {
        self.attachments.detach(attachment);
    }

    /// Current countdown state as last published by the engine
    pub fn countdown(&self) -> CountdownState {
        self.attachments.current()
    }

    /// Start a fresh countdown from the configured default length
    pub fn start_fresh(&self) -> Result<u64, CommandError> {
        self.start_at(self.default_initial)?;
        Ok(self.default_initial)
    }

    /// Start a countdown from `initial` seconds, discarding any run in flight
    pub fn start_at(&self, initial: u64) -> Result<(), CommandError> {
        self.engine.start(initial)?;
        // a fresh start invalidates any paused snapshot
        if let Err(e) = self.store.save(&RecoverySnapshot::cleared()) {
            warn!("failed to clear recovery snapshot on start: {}", e);
        }
        self.record_action("start");
        Ok(())
    }

    /// Toggle pause/resume based on the engine's own phase.
    ///
    /// Entering Paused persists the remaining value observed at the moment of
    /// the request; leaving Paused clears the paused flag. Issued while Idle
    /// or Completed this is an ignored command.
    pub fn toggle_pause(&self) -> ToggleOutcome {
        let current = self.countdown();
        match current.phase() {
            Phase::Running => {
                self.engine.toggle_pause();
                let snapshot = RecoverySnapshot::paused_at(current.remaining());
                let persisted = match self.store.save(&snapshot) {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("failed to persist pause snapshot: {}", e);
                        false
                    }
                };
                self.record_action("pause");
                ToggleOutcome::Pausing {
                    remaining: current.remaining(),
                    persisted,
                }
            }
            Phase::Paused => {
                self.engine.toggle_pause();
                if let Err(e) = self.store.save(&RecoverySnapshot::cleared()) {
                    warn!("failed to clear recovery snapshot on resume: {}", e);
                }
                self.record_action("resume");
                ToggleOutcome::Resuming {
                    remaining: current.remaining(),
                }
            }
            Phase::Idle | Phase::Completed => {
                debug!(phase = ?current.phase(), "pause toggle ignored, nothing to pause");
                ToggleOutcome::Ignored
            }
        }
    }

    /// Attach-time recovery: resume a paused run where it left off, or start
    /// a fresh countdown when no resumable snapshot exists.
    ///
    /// The snapshot stays marked paused until the user actually resumes, so a
    /// second restart before then still recovers to the same point. An
    /// unreadable snapshot degrades to a fresh start.
    pub fn recover_on_attach(&self) -> Result<RecoveryOutcome, CommandError> {
        let snapshot = match self.store.load() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("unreadable recovery snapshot, starting fresh: {}", e);
                RecoverySnapshot::default()
            }
        };

        if snapshot.is_resumable() {
            info!(
                remaining = snapshot.saved_value,
                "resuming paused countdown from recovery snapshot"
            );
            self.engine.start(snapshot.saved_value)?;
            self.engine.toggle_pause();
            self.record_action("recover");
            Ok(RecoveryOutcome::Resumed {
                remaining: snapshot.saved_value,
            })
        } else {
            info!(
                initial = self.default_initial,
                "no paused run recorded, starting fresh countdown"
            );
            self.start_at(self.default_initial)?;
            Ok(RecoveryOutcome::Fresh {
                initial: self.default_initial,
            })
        }
    }

    /// Record the last command for the status endpoint
    fn record_action(&self, action: &str) {
        *self
            .last_action
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(action.to_string());
        *self
            .last_action_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Utc::now());
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self
            .last_action
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let last_action_time = *self
            .last_action_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        (last_action, last_action_time)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
