//! Repository for the `listings` table.
//!
//! Besides plain create/read, this hosts the expiry sweep: a single
//! bulk `UPDATE` that withdraws full listings whose grace period elapsed.

use slotboard_core::error::CoreError;
use slotboard_core::sweep::{sweep_cutoff, validate_grace_hours, SweepReport};
use slotboard_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::listing::Listing;

/// Column list for `listings` queries.
const COLUMNS: &str = "\
    id, title, tier, capacity, consumed, filled_at, visible_until, \
    created_at, updated_at";

/// Shared sweep predicate. `$1` is the cutoff, `$2` is "now".
const SWEEPABLE: &str = "\
    filled_at IS NOT NULL \
    AND (filled_at <= $1 OR updated_at <= $1) \
    AND (visible_until IS NULL OR visible_until > $2)";

/// Resolve the sweep cutoff, rejecting grace periods outside the accepted
/// range as a configuration error instead of overflowing the clock maths.
fn cutoff_for(now: Timestamp, grace_hours: i64) -> Result<Timestamp, sqlx::Error> {
    let grace_hours =
        validate_grace_hours(grace_hours).map_err(|e| sqlx::Error::Configuration(Box::new(e)))?;
    sweep_cutoff(now, grace_hours).ok_or_else(|| {
        sqlx::Error::Configuration(Box::new(CoreError::Validation(format!(
            "Grace period of {grace_hours} hours reaches before the earliest timestamp"
        ))))
    })
}

/// Provides CRUD and sweep operations for listings.
pub struct ListingRepo;

impl ListingRepo {
    /// Insert a new listing with zero consumed slots.
    ///
    /// The caller is responsible for validating the title and resolving
    /// the capacity (see `slotboard_core::listing`).
    pub async fn create(
        pool: &PgPool,
        title: &str,
        tier: &str,
        capacity: i32,
    ) -> Result<Listing, sqlx::Error> {
        let query = format!(
            "INSERT INTO listings (title, tier, capacity) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(title)
            .bind(tier)
            .bind(capacity)
            .fetch_one(pool)
            .await
    }

    /// Find a listing by id, visible or not.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM listings WHERE id = $1");
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Public feed: listings not yet withdrawn, newest first.
    ///
    /// `exclude_ids` removes listings the respondent already claimed.
    pub async fn list_visible(
        pool: &PgPool,
        exclude_ids: &[DbId],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM listings \
             WHERE (visible_until IS NULL OR visible_until > NOW()) \
               AND NOT (id = ANY($1)) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(exclude_ids)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    // ── Expiry sweep ──────────────────────────────────────────────────

    /// Count listings the sweep would withdraw at `now` (dry run).
    pub async fn count_expirable(
        pool: &PgPool,
        now: Timestamp,
        grace_hours: i64,
    ) -> Result<u64, sqlx::Error> {
        let cutoff = cutoff_for(now, grace_hours)?;
        let query = format!("SELECT COUNT(*) FROM listings WHERE {SWEEPABLE}");
        let count: (i64,) = sqlx::query_as(&query)
            .bind(cutoff)
            .bind(now)
            .fetch_one(pool)
            .await?;
        Ok(count.0.max(0) as u64)
    }

    /// Withdraw every full listing past its grace period by setting
    /// `visible_until = now`, in one statement.
    ///
    /// Idempotent: rows withdrawn by an earlier run no longer match.
    /// Returns the number of rows affected.
    pub async fn expire_filled(
        pool: &PgPool,
        now: Timestamp,
        grace_hours: i64,
    ) -> Result<u64, sqlx::Error> {
        let cutoff = cutoff_for(now, grace_hours)?;
        let query = format!("UPDATE listings SET visible_until = $2 WHERE {SWEEPABLE}");
        let result = sqlx::query(&query)
            .bind(cutoff)
            .bind(now)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Run one sweep as of `now` and describe what it did.
    ///
    /// In dry-run mode the matching rows are only counted.
    pub async fn run_sweep(
        pool: &PgPool,
        now: Timestamp,
        grace_hours: i64,
        dry_run: bool,
    ) -> Result<SweepReport, sqlx::Error> {
        let cutoff = cutoff_for(now, grace_hours)?;
        let count = if dry_run {
            Self::count_expirable(pool, now, grace_hours).await?
        } else {
            Self::expire_filled(pool, now, grace_hours).await?
        };
        Ok(SweepReport {
            cutoff,
            ttl_hours: grace_hours,
            dry_run,
            count,
        })
    }
}
