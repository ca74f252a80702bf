//! Tickdown - a state-managed countdown timer service
//!
//! The countdown engine runs as a long-lived background task, independent of
//! any presentation layer. At most one observer at a time attaches to receive
//! tick notifications; pausing persists a small recovery snapshot so a fresh
//! observer (even after a full process restart) resumes exactly where the
//! countdown left off.

pub mod api;
pub mod config;
pub mod engine;
pub mod recovery;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use engine::{Attachment, AttachmentManager, CommandError, EngineHandle, Tick};
pub use recovery::{JsonFileStore, MemoryStore, RecoverySnapshot, RecoveryStore, StoreError};
pub use state::{AppState, CountdownState, Phase};
pub use utils::signals::shutdown_signal;
