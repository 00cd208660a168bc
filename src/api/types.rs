//! API query and error types.
//!
//! Readings and summaries serialize directly from their domain types, which
//! already carry the camelCase wire names.

use serde::{Deserialize, Serialize};

/// Query parameters for `GET /api/energy/telemetry`.
#[derive(Debug, Default, Deserialize)]
pub struct TelemetryQuery {
    /// Only return readings with this status (`Normal`, `Peak`, `Maintenance`).
    pub status: Option<String>,
    /// Return at most this many readings, after sorting by id.
    pub limit: Option<usize>,
}

/// JSON error body returned for 4xx responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error description.
    pub error: String,
}
