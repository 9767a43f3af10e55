//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{settings::Statistics, state::StatusSnapshot};

/// API response structure for control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub machine: StatusSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, machine: StatusSnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            machine,
        }
    }

    /// The operation took effect
    pub fn ok(message: String, machine: StatusSnapshot) -> Self {
        Self::new("ok".to_string(), message, machine)
    }

    /// The operation does not apply in the current state
    pub fn ignored(message: String, machine: StatusSnapshot) -> Self {
        Self::new("ignored".to_string(), message, machine)
    }
}

/// Status response with statistics and server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub machine: StatusSnapshot,
    pub statistics: Statistics,
    pub uptime: String,
    pub port: u16,
    pub host: String,
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
