//! Listing lifecycle state derivation.
//!
//! The displayed state of a listing is never stored. It is recomputed from
//! the allocation counters, the listing's age and its `filled_at` stamp
//! whenever a reader needs it, so any snapshot of those columns (even an
//! eventually-consistent one) yields a coherent state.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Fill ratio (in percent of capacity) at which a listing counts as hot.
pub const HOT_THRESHOLD_PCT: i64 = 34;

/// Age after which a listing that has not filled gets the cosmetic
/// "expiring soon" hint when the caller does not supply one.
pub const STALE_AFTER_HOURS: i64 = 168;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Display state of a listing, declared in ascending order of closedness.
///
/// The derived `Ord` is load-bearing: for a fixed capacity and hint, the
/// state never decreases as `consumed` grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingState {
    New,
    Bidding,
    Hot,
    Expiring,
    Full,
}

impl ListingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Bidding => "bidding",
            Self::Hot => "hot",
            Self::Expiring => "expiring",
            Self::Full => "full",
        }
    }

    /// `Full` is terminal; only visibility withdrawal follows it.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Full)
    }
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// True once every slot is taken, or once the listing has ever been full.
pub fn is_full(capacity: i32, consumed: i32, filled_at: Option<Timestamp>) -> bool {
    filled_at.is_some() || consumed >= capacity
}

/// Default "expiring soon" hint: an unfilled listing that has been open
/// for at least [`STALE_AFTER_HOURS`].
pub fn near_expiry_hint(age_hours: i64) -> bool {
    age_hours >= STALE_AFTER_HOURS
}

/// Derive the display state of a listing.
///
/// Precedence: `Full`, then `Expiring`, then the consumption bands
/// (`Hot` at or above [`HOT_THRESHOLD_PCT`], `Bidding` below it, `New` at
/// zero). `near_expiry` is a display hint only; when `None` it falls back
/// to [`near_expiry_hint`] on `age_hours`. It never affects sweeping.
pub fn derive_state(
    capacity: i32,
    consumed: i32,
    age_hours: i64,
    filled_at: Option<Timestamp>,
    near_expiry: Option<bool>,
) -> ListingState {
    if is_full(capacity, consumed, filled_at) {
        return ListingState::Full;
    }

    if near_expiry.unwrap_or_else(|| near_expiry_hint(age_hours)) {
        return ListingState::Expiring;
    }

    if consumed <= 0 {
        return ListingState::New;
    }

    let capacity = i64::from(capacity.max(1));
    if i64::from(consumed) * 100 >= capacity * HOT_THRESHOLD_PCT {
        ListingState::Hot
    } else {
        ListingState::Bidding
    }
}

/// Percentage of capacity consumed, clamped to `0..=100`.
pub fn fill_pct(capacity: i32, consumed: i32) -> u8 {
    if capacity <= 0 {
        return 100;
    }
    let pct = (i64::from(consumed.max(0)) * 100 / i64::from(capacity)).min(100);
    pct as u8
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn zero_consumed_is_new() {
        assert_eq!(derive_state(5, 0, 1, None, Some(false)), ListingState::New);
    }

    #[test]
    fn low_consumption_is_bidding() {
        assert_eq!(derive_state(10, 3, 1, None, Some(false)), ListingState::Bidding);
    }

    #[test]
    fn hot_band_starts_at_threshold() {
        // 34% of 100 exactly.
        assert_eq!(derive_state(100, 34, 1, None, Some(false)), ListingState::Hot);
        assert_eq!(derive_state(100, 33, 1, None, Some(false)), ListingState::Bidding);
        assert_eq!(derive_state(3, 1, 1, None, Some(false)), ListingState::Hot);
    }

    #[test]
    fn reaching_capacity_is_full() {
        assert_eq!(derive_state(3, 3, 1, None, Some(false)), ListingState::Full);
    }

    #[test]
    fn filled_at_keeps_listing_full() {
        let filled = Some(Utc::now());
        assert_eq!(derive_state(3, 1, 1, filled, Some(false)), ListingState::Full);
    }

    #[test]
    fn full_takes_precedence_over_expiry_hint() {
        assert_eq!(derive_state(2, 2, 500, None, Some(true)), ListingState::Full);
    }

    #[test]
    fn explicit_hint_marks_unfilled_listing_expiring() {
        assert_eq!(derive_state(5, 1, 1, None, Some(true)), ListingState::Expiring);
    }

    #[test]
    fn stale_listing_defaults_to_expiring() {
        assert_eq!(
            derive_state(5, 0, STALE_AFTER_HOURS, None, None),
            ListingState::Expiring
        );
        assert_eq!(
            derive_state(5, 0, STALE_AFTER_HOURS - 1, None, None),
            ListingState::New
        );
    }

    #[test]
    fn state_is_monotonic_in_consumption() {
        for capacity in 1..=25 {
            for hint in [Some(false), Some(true), None] {
                let mut previous = ListingState::New;
                for consumed in 0..=capacity {
                    let state = derive_state(capacity, consumed, 3, None, hint);
                    assert!(
                        state >= previous,
                        "capacity {capacity}, consumed {consumed}: {state:?} < {previous:?}"
                    );
                    previous = state;
                }
                assert_eq!(previous, ListingState::Full);
            }
        }
    }

    #[test]
    fn fill_pct_clamps() {
        assert_eq!(fill_pct(4, 0), 0);
        assert_eq!(fill_pct(4, 2), 50);
        assert_eq!(fill_pct(4, 9), 100);
    }
}
