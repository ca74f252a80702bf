//! In-process recovery store

use std::sync::{Mutex, PoisonError};

use super::{RecoverySnapshot, RecoveryStore, StoreError};

/// Recovery store backed by process memory.
///
/// Does not survive a restart; useful for tests and for embedding the engine
/// where durable recovery is not wanted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<RecoverySnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the store, e.g. to stand in for a snapshot written by a
    /// previous process
    pub fn with_snapshot(snapshot: RecoverySnapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
        }
    }
}

impl RecoveryStore for MemoryStore {
    fn load(&self) -> Result<RecoverySnapshot, StoreError> {
        Ok(*self.snapshot.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn save(&self, snapshot: &RecoverySnapshot) -> Result<(), StoreError> {
        *self.snapshot.lock().unwrap_or_else(PoisonError::into_inner) = *snapshot;
        Ok(())
    }
}
