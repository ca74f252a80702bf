//! Recovery store contract
//!
//! The engine never touches durable storage; the observer side persists a
//! small snapshot whenever it pauses the countdown and reads it back once at
//! attach time to decide whether to resume or start fresh. The store itself
//! is an external collaborator specified only at this interface.

pub mod json_store;
pub mod memory;

pub use json_store::JsonFileStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Persisted record of a paused countdown.
///
/// The field names on the wire (`timer_value`, `paused_state`) are the
/// store's key schema and must stay stable across process restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RecoverySnapshot {
    /// Remaining seconds at the time of the pause
    #[serde(rename = "timer_value")]
    pub saved_value: u64,
    /// Whether a resumable paused run exists
    #[serde(rename = "paused_state")]
    pub paused: bool,
}

impl RecoverySnapshot {
    /// Snapshot recording a pause at `saved_value` seconds remaining
    pub fn paused_at(saved_value: u64) -> Self {
        Self {
            saved_value,
            paused: true,
        }
    }

    /// Snapshot recording that no resumable run exists
    pub fn cleared() -> Self {
        Self {
            saved_value: 0,
            paused: false,
        }
    }

    /// Whether this snapshot describes a run worth resuming
    pub fn is_resumable(&self) -> bool {
        self.paused && self.saved_value > 0
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("recovery store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("recovery snapshot is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Durable key/value persistence for the recovery snapshot.
///
/// Implementations must tolerate a snapshot that was never written: `load`
/// returns the default (not paused) snapshot rather than an error in that
/// case.
pub trait RecoveryStore: Send + Sync {
    fn load(&self) -> Result<RecoverySnapshot, StoreError>;
    fn save(&self, snapshot: &RecoverySnapshot) -> Result<(), StoreError>;
}
