//! Listing entity model and DTOs.

use serde::{Deserialize, Serialize};
use slotboard_core::lifecycle::{self, ListingState};
use slotboard_core::listing::ListingTier;
use slotboard_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `listings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Listing {
    pub id: DbId,
    pub title: String,
    pub tier: String,
    pub capacity: i32,
    pub consumed: i32,
    pub filled_at: Option<Timestamp>,
    pub visible_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Listing {
    /// Parsed tier; unknown values (impossible under the CHECK constraint)
    /// fall back to the standard tier.
    pub fn tier(&self) -> ListingTier {
        ListingTier::from_str_value(&self.tier).unwrap_or_default()
    }

    /// Whole hours since the listing was created, as of `now`.
    pub fn age_hours(&self, now: Timestamp) -> i64 {
        (now - self.created_at).num_hours().max(0)
    }

    /// Display state as of `now`, using the age-based expiry hint.
    pub fn state_at(&self, now: Timestamp) -> ListingState {
        lifecycle::derive_state(
            self.capacity,
            self.consumed,
            self.age_hours(now),
            self.filled_at,
            None,
        )
    }
}

/// DTO for creating a new listing. Capacity falls back to the tier default.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateListing {
    pub title: String,
    #[serde(default)]
    pub tier: ListingTier,
    pub capacity: Option<i32>,
}
