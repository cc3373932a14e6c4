//! Error response body for denial responses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reason-coded denial body
///
/// `error` is a stable code (`revoked`, `expired`, `invalid`, ...) so
/// clients can choose their recovery behavior without parsing the message.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl ToString, message: impl ToString) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        }
    }
}
