//! Repository for the `quote_requests` table.
//!
//! Reference assignment is a bounded retry loop over single-statement
//! updates. Each attempt only writes when the row is still referenceless,
//! so concurrent callers for the same request converge on one value and
//! `uq_quote_requests_reference` arbitrates between different requests.

use slotboard_core::reference::{build_reference, jitter_for_attempt, MAX_REFERENCE_ATTEMPTS};
use slotboard_core::types::DbId;
use sqlx::PgPool;

use crate::is_unique_violation;
use crate::models::quote_request::{CreateQuoteRequest, QuoteRequest, ReferenceAssignment};

/// Column list for `quote_requests` queries.
const COLUMNS: &str = "\
    id, listing_id, contact_name, message, reference, created_at, updated_at";

/// Unique constraint guarding `quote_requests.reference`.
pub const REFERENCE_CONSTRAINT: &str = "uq_quote_requests_reference";

/// Provides CRUD and reference assignment for quote requests.
pub struct QuoteRequestRepo;

impl QuoteRequestRepo {
    /// Insert a new request without a reference.
    pub async fn create(
        pool: &PgPool,
        input: &CreateQuoteRequest,
    ) -> Result<QuoteRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO quote_requests (listing_id, contact_name, message) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QuoteRequest>(&query)
            .bind(input.listing_id)
            .bind(input.contact_name.trim())
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }

    /// Find a request by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<QuoteRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quote_requests WHERE id = $1");
        sqlx::query_as::<_, QuoteRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a request by its assigned reference.
    pub async fn find_by_reference(
        pool: &PgPool,
        reference: &str,
    ) -> Result<Option<QuoteRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quote_requests WHERE reference = $1");
        sqlx::query_as::<_, QuoteRequest>(&query)
            .bind(reference)
            .fetch_optional(pool)
            .await
    }

    /// Give a request its unique reference, or return the one it has.
    ///
    /// Up to [`MAX_REFERENCE_ATTEMPTS`] candidates are tried; every retry
    /// after a collision jitters the time seed. Losing a race against a
    /// concurrent assignment for the same request is not a collision: the
    /// stored value is re-read and returned.
    pub async fn assign_reference(
        pool: &PgPool,
        id: DbId,
    ) -> Result<ReferenceAssignment, sqlx::Error> {
        Self::assign_reference_with(pool, id, jitter_for_attempt).await
    }

    /// [`Self::assign_reference`] with the per-attempt time-seed offset
    /// supplied by the caller. `jitter(attempt)` is called once per
    /// attempt, starting at `0`.
    pub async fn assign_reference_with(
        pool: &PgPool,
        id: DbId,
        mut jitter: impl FnMut(u32) -> i64,
    ) -> Result<ReferenceAssignment, sqlx::Error> {
        for attempt in 0..MAX_REFERENCE_ATTEMPTS {
            let Some(request) = Self::find_by_id(pool, id).await? else {
                return Ok(ReferenceAssignment::NotFound);
            };
            if let Some(existing) = request.reference {
                return Ok(ReferenceAssignment::Assigned(existing));
            }

            let candidate =
                build_reference(request.created_at, request.id, jitter(attempt));

            let stored: Result<Option<(String,)>, sqlx::Error> = sqlx::query_as(
                "UPDATE quote_requests SET reference = $2, updated_at = NOW() \
                 WHERE id = $1 AND reference IS NULL \
                 RETURNING reference",
            )
            .bind(id)
            .bind(&candidate)
            .fetch_optional(pool)
            .await;

            match stored {
                Ok(Some((reference,))) => {
                    tracing::debug!(request_id = id, %reference, attempt, "Reference assigned");
                    return Ok(ReferenceAssignment::Assigned(reference));
                }
                // Someone else assigned it between our read and write.
                Ok(None) => match Self::find_by_id(pool, id).await? {
                    Some(QuoteRequest {
                        reference: Some(reference),
                        ..
                    }) => return Ok(ReferenceAssignment::Assigned(reference)),
                    Some(_) => continue,
                    None => return Ok(ReferenceAssignment::NotFound),
                },
                Err(e) if is_unique_violation(&e, REFERENCE_CONSTRAINT) => {
                    tracing::warn!(
                        request_id = id,
                        candidate = %candidate,
                        attempt,
                        "Reference collision, retrying with jittered seed"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        tracing::error!(
            request_id = id,
            attempts = MAX_REFERENCE_ATTEMPTS,
            "Reference allocation exhausted"
        );
        Ok(ReferenceAssignment::Exhausted {
            attempts: MAX_REFERENCE_ATTEMPTS,
        })
    }
}
