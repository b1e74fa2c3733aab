//! Claim entity model.

use serde::Serialize;
use slotboard_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `claims` table. Claims are insert-only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Claim {
    pub id: DbId,
    pub listing_id: DbId,
    pub respondent_fingerprint: String,
    pub respondent_id: Option<DbId>,
    pub created_at: Timestamp,
}
