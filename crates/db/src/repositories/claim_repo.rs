//! Repository for the `claims` table and the slot allocator.
//!
//! [`ClaimRepo::claim_slot`] is the only writer of `listings.consumed`.
//! It runs as one transaction: the listing row is locked, the claim is
//! inserted against `uq_claims_listing_fingerprint`, and the counter is
//! bumped only if that insert produced a row and a slot is still free.

use chrono::{Duration, Utc};
use slotboard_core::claim::{ClaimOutcome, ClaimStatus, Fingerprint};
use slotboard_core::lifecycle;
use slotboard_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::claim::Claim;

/// Column list for `claims` queries.
const COLUMNS: &str = "id, listing_id, respondent_fingerprint, respondent_id, created_at";

/// Provides the allocator and read-only claim queries.
pub struct ClaimRepo;

impl ClaimRepo {
    /// Claim one contact slot on a listing for a respondent.
    ///
    /// Returns `Ok(None)` when the listing does not exist. Otherwise:
    ///
    /// - `AlreadyClaimed`: the fingerprint holds a claim on this listing;
    ///   nothing is written and the current counters are returned.
    /// - `Full`: every slot is taken; the transaction is rolled back.
    /// - `Ok`: exactly one claim row was inserted and `consumed` went up
    ///   by one. `filled_at` is stamped when this claim takes the last slot.
    ///
    /// A duplicate is reported ahead of fullness so a respondent who
    /// joined before the listing filled still sees their claim.
    pub async fn claim_slot(
        pool: &PgPool,
        listing_id: DbId,
        fingerprint: &Fingerprint,
        respondent_id: Option<DbId>,
    ) -> Result<Option<ClaimOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Lock the listing so concurrent claims on it serialize here.
        let row: Option<(i32, i32, Option<Timestamp>)> = sqlx::query_as(
            "SELECT capacity, consumed, filled_at FROM listings \
             WHERE id = $1 FOR UPDATE",
        )
        .bind(listing_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((capacity, consumed, filled_at)) = row else {
            return Ok(None);
        };

        // ON CONFLICT keeps the transaction usable; a raised unique
        // violation would abort it.
        let inserted: Option<(DbId,)> = sqlx::query_as(
            "INSERT INTO claims (listing_id, respondent_fingerprint, respondent_id) \
             VALUES ($1, $2, $3) \
             ON CONFLICT ON CONSTRAINT uq_claims_listing_fingerprint DO NOTHING \
             RETURNING id",
        )
        .bind(listing_id)
        .bind(fingerprint.as_str())
        .bind(respondent_id)
        .fetch_optional(&mut *tx)
        .await?;

        if inserted.is_none() {
            tx.rollback().await?;
            tracing::debug!(listing_id, %fingerprint, "Duplicate claim ignored");
            return Ok(Some(ClaimOutcome {
                status: ClaimStatus::AlreadyClaimed,
                consumed,
                capacity,
            }));
        }

        if consumed >= capacity {
            tx.rollback().await?;
            tracing::debug!(listing_id, consumed, capacity, "Claim rejected, listing full");
            return Ok(Some(ClaimOutcome {
                status: ClaimStatus::Full,
                consumed,
                capacity,
            }));
        }

        let fills_now =
            filled_at.is_none() && lifecycle::is_full(capacity, consumed + 1, None);

        let (consumed, capacity): (i32, i32) = sqlx::query_as(
            "UPDATE listings SET \
                 consumed   = consumed + 1, \
                 updated_at = NOW(), \
                 filled_at  = CASE WHEN $2 THEN NOW() ELSE filled_at END \
             WHERE id = $1 \
             RETURNING consumed, capacity",
        )
        .bind(listing_id)
        .bind(fills_now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        if fills_now {
            tracing::info!(listing_id, capacity, "Listing filled");
        }

        Ok(Some(ClaimOutcome {
            status: ClaimStatus::Ok,
            consumed,
            capacity,
        }))
    }

    /// Distinct listing ids the fingerprint claimed within the last
    /// `lookback_hours`, ascending. An unknown fingerprint yields an
    /// empty list.
    pub async fn list_claimed_listing_ids(
        pool: &PgPool,
        fingerprint: &str,
        lookback_hours: i64,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let since = Utc::now() - Duration::hours(lookback_hours);
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT DISTINCT listing_id FROM claims \
             WHERE respondent_fingerprint = $1 AND created_at >= $2 \
             ORDER BY listing_id",
        )
        .bind(fingerprint)
        .bind(since)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// All claims on a listing, oldest first.
    pub async fn list_by_listing(pool: &PgPool, listing_id: DbId) -> Result<Vec<Claim>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM claims \
             WHERE listing_id = $1 ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Claim>(&query)
            .bind(listing_id)
            .fetch_all(pool)
            .await
    }
}
