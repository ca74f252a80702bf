//! File-backed recovery store

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::debug;

use super::{RecoverySnapshot, RecoveryStore, StoreError};

/// Recovery store persisting the snapshot as a small JSON file.
///
/// A missing file is the "never paused" state, not an error, so first boot
/// and post-completion boots behave identically.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecoveryStore for JsonFileStore {
    fn load(&self) -> Result<RecoverySnapshot, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no recovery file, loading default snapshot");
                return Ok(RecoverySnapshot::default());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&self, snapshot: &RecoverySnapshot) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, contents)?;
        debug!(
            path = %self.path.display(),
            saved_value = snapshot.saved_value,
            paused = snapshot.paused,
            "recovery snapshot written"
        );
        Ok(())
    }
}
