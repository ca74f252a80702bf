//! State management module
//!
//! This module contains all state-related structures and their management logic.

pub mod app_state;
pub mod countdown;

// Re-export main types
pub use app_state::{AppState, RecoveryOutcome, ToggleOutcome};
pub use countdown::{CountdownState, PauseToggle, Phase};
