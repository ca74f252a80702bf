//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::CountdownState;

/// Request body for POST /start; the body itself is optional
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartRequest {
    /// Countdown length in seconds; omitted means the configured default
    pub initial: Option<u64>,
}

/// API response structure for command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub countdown: CountdownState,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, countdown: CountdownState) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            countdown,
        }
    }

    /// Create a response for an accepted command
    pub fn ok(message: String, countdown: CountdownState) -> Self {
        Self::new("ok".to_string(), message, countdown)
    }

    /// Create a response for a benign ignored command
    pub fn ignored(message: String, countdown: CountdownState) -> Self {
        Self::new("ignored".to_string(), message, countdown)
    }

    /// Create an error response
    pub fn error(message: String, countdown: CountdownState) -> Self {
        Self::new("error".to_string(), message, countdown)
    }
}

/// Status response with countdown and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub countdown: CountdownState,
    pub default_initial: u64,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
