//! Countdown state machine

use serde::{Deserialize, Serialize};

use crate::engine::CommandError;

/// Lifecycle phase of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Outcome of a pause toggle, used by callers to decide what to persist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseToggle {
    /// Running -> Paused, tick production halted
    Paused,
    /// Paused -> Running, tick production resumes from the frozen value
    Resumed,
    /// Toggle issued while Idle or Completed; benign, nothing changed
    Ignored,
}

/// The authoritative countdown state.
///
/// Transitions are pure functions over this struct; the engine task owns the
/// only mutable instance and drives `tick` from its one-second cadence.
/// Invariant: `phase == Completed` implies `remaining == 0`, and `remaining`
/// only ever decreases while `Running`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownState {
    remaining: u64,
    phase: Phase,
}

impl CountdownState {
    /// Create a new idle countdown with nothing on the clock
    pub fn new() -> Self {
        Self {
            remaining: 0,
            phase: Phase::Idle,
        }
    }

    /// Seconds left on the clock
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether tick production is currently active
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Begin a countdown from `initial` seconds.
    ///
    /// Valid from any phase; a run already in flight is discarded. The only
    /// rejected input is `initial == 0`, which leaves the state untouched.
    pub(crate) fn start(&mut self, initial: u64) -> Result<(), CommandError> {
        if initial == 0 {
            return Err(CommandError::InvalidInitial(initial));
        }
        self.remaining = initial;
        self.phase = Phase::Running;
        Ok(())
    }

    /// Toggle between Running and Paused, based on the current phase.
    ///
    /// Issued while Idle or Completed this is an ignored command, never an
    /// error: there is nothing to pause before the first `start`.
    pub(crate) fn toggle_pause(&mut self) -> PauseToggle {
        match self.phase {
            Phase::Running => {
                self.phase = Phase::Paused;
                PauseToggle::Paused
            }
            Phase::Paused => {
                self.phase = Phase::Running;
                PauseToggle::Resumed
            }
            Phase::Idle | Phase::Completed => PauseToggle::Ignored,
        }
    }

    /// Account for one elapsed second.
    ///
    /// Returns the new remaining value when a tick was produced, or `None`
    /// when the countdown is not running. Reaching zero flips the phase to
    /// Completed; no further ticks are produced until the next `start`.
    pub(crate) fn tick(&mut self) -> Option<u64> {
        if self.phase != Phase::Running {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.phase = Phase::Completed;
        }
        Some(self.remaining)
    }
}

impl Default for CountdownState {
    fn default() -> Self {
        Self::new()
    }
}
