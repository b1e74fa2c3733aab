//! Expiry sweep rules for full listings.
//!
//! A listing that filled stays publicly visible for a grace period and is
//! then withdrawn by stamping `visible_until`. The selection predicate only
//! looks at fullness and timestamps; the cosmetic expiry hint from
//! [`crate::lifecycle`] plays no part in it.

use chrono::TimeDelta;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Default grace period between filling and withdrawal.
pub const DEFAULT_GRACE_HOURS: i64 = 72;

/// Longest accepted grace period (100 years).
pub const MAX_GRACE_HOURS: i64 = 24 * 365 * 100;

/// Check a configured grace period against `0..=MAX_GRACE_HOURS`.
pub fn validate_grace_hours(hours: i64) -> Result<i64, CoreError> {
    if !(0..=MAX_GRACE_HOURS).contains(&hours) {
        return Err(CoreError::Validation(format!(
            "Grace period must be between 0 and {MAX_GRACE_HOURS} hours, got {hours}"
        )));
    }
    Ok(hours)
}

/// Rows older than this instant (by `filled_at` or `updated_at`) are due.
///
/// `None` when the grace period reaches past the representable range, in
/// which case nothing can be due yet.
pub fn sweep_cutoff(now: Timestamp, grace_hours: i64) -> Option<Timestamp> {
    TimeDelta::try_hours(grace_hours).and_then(|grace| now.checked_sub_signed(grace))
}

/// A listing is visible until its `visible_until` instant has passed.
pub fn is_visible(visible_until: Option<Timestamp>, now: Timestamp) -> bool {
    visible_until.is_none_or(|until| until > now)
}

/// When a full listing becomes eligible for withdrawal.
pub fn withdrawal_due_at(filled_at: Option<Timestamp>, grace_hours: i64) -> Option<Timestamp> {
    let grace = TimeDelta::try_hours(grace_hours)?;
    filled_at?.checked_add_signed(grace)
}

/// In-memory form of the sweep selection predicate.
///
/// Kept in lockstep with `ListingRepo::expire_filled`: a listing is due
/// when it has filled, either its fill or its last update is at or before
/// the cutoff, and it is not already withdrawn.
pub fn is_sweepable(
    filled_at: Option<Timestamp>,
    updated_at: Timestamp,
    visible_until: Option<Timestamp>,
    now: Timestamp,
    grace_hours: i64,
) -> bool {
    let Some(filled_at) = filled_at else {
        return false;
    };
    let Some(cutoff) = sweep_cutoff(now, grace_hours) else {
        return false;
    };
    (filled_at <= cutoff || updated_at <= cutoff) && is_visible(visible_until, now)
}

/// Outcome of one sweep run, logged as a single structured line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub cutoff: Timestamp,
    pub ttl_hours: i64,
    pub dry_run: bool,
    /// Rows withdrawn, or in dry-run mode the rows that would be.
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn cutoff_subtracts_grace() {
        assert_eq!(sweep_cutoff(t0(), 72), Some(t0() - Duration::hours(72)));
    }

    #[test]
    fn huge_grace_has_no_cutoff() {
        assert_eq!(sweep_cutoff(t0(), 3_000_000_000_000_000), None);
        assert_eq!(sweep_cutoff(t0(), i64::MAX), None);
        assert_eq!(withdrawal_due_at(Some(t0()), i64::MAX), None);

        let filled = t0() - Duration::days(365);
        assert!(!is_sweepable(Some(filled), filled, None, t0(), i64::MAX));
    }

    #[test]
    fn grace_hours_bounds() {
        assert_eq!(validate_grace_hours(0).unwrap(), 0);
        assert_eq!(validate_grace_hours(MAX_GRACE_HOURS).unwrap(), MAX_GRACE_HOURS);
        assert!(validate_grace_hours(-1).is_err());
        assert!(validate_grace_hours(MAX_GRACE_HOURS + 1).is_err());
        assert!(validate_grace_hours(3_000_000_000_000_000).is_err());
    }

    #[test]
    fn unfilled_listing_is_never_sweepable() {
        let now = t0() + Duration::days(30);
        assert!(!is_sweepable(None, t0(), None, now, 72));
    }

    #[test]
    fn grace_period_boundary() {
        let filled = t0();
        assert!(!is_sweepable(Some(filled), filled, None, filled + Duration::hours(71), 72));
        assert!(is_sweepable(Some(filled), filled, None, filled + Duration::hours(72), 72));
        assert!(is_sweepable(Some(filled), filled, None, filled + Duration::hours(73), 72));
    }

    #[test]
    fn already_withdrawn_listing_is_not_sweepable() {
        let filled = t0();
        let now = filled + Duration::hours(100);
        let hidden = Some(filled + Duration::hours(80));
        assert!(!is_sweepable(Some(filled), filled, hidden, now, 72));
    }

    #[test]
    fn visibility_in_future_still_visible() {
        assert!(is_visible(Some(t0() + Duration::minutes(1)), t0()));
        assert!(!is_visible(Some(t0()), t0()));
        assert!(is_visible(None, t0()));
    }

    #[test]
    fn withdrawal_due_at_adds_grace() {
        assert_eq!(withdrawal_due_at(None, 72), None);
        assert_eq!(
            withdrawal_due_at(Some(t0()), 72),
            Some(t0() + Duration::hours(72))
        );
    }
}
