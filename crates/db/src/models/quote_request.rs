//! Quote request entity model and DTOs.

use serde::{Deserialize, Serialize};
use slotboard_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `quote_requests` table.
///
/// `reference` stays `NULL` until assigned and never changes afterwards.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuoteRequest {
    pub id: DbId,
    pub listing_id: Option<DbId>,
    pub contact_name: String,
    pub message: Option<String>,
    pub reference: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for submitting a new quote request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuoteRequest {
    pub listing_id: Option<DbId>,
    pub contact_name: String,
    pub message: Option<String>,
}

/// Result of trying to give a request its reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceAssignment {
    /// The request now holds this reference (freshly stored or pre-existing).
    Assigned(String),
    /// No request with the given id.
    NotFound,
    /// Every candidate collided; the request is still referenceless.
    Exhausted { attempts: u32 },
}
