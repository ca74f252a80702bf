//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod display;

// Re-export main functions
pub use display::tick_display_task;
