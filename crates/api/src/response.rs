//! Shared response envelope types for API handlers.
//!
//! Resource endpoints (listings, quote requests, sweep reports) respond
//! with a `{ "data": ... }` envelope. The claim, dedup and reference
//! endpoints return their documented bodies unwrapped.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
