//! Integration tests for the slot allocator (`ClaimRepo::claim_slot`).
//!
//! Runs against a real database to verify that:
//! - Each fingerprint can claim a listing at most once, even concurrently
//! - `consumed` grows by exactly one per successful claim
//! - `filled_at` is stamped when the last slot goes and never reverts
//! - Claims beyond capacity are rejected with `Full` and leave no row

use assert_matches::assert_matches;
use futures::future::join_all;
use slotboard_core::claim::{ClaimOutcome, ClaimStatus, Fingerprint};
use slotboard_core::lifecycle::ListingState;
use slotboard_db::models::listing::Listing;
use slotboard_db::repositories::{ClaimRepo, ListingRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_listing(pool: &PgPool, capacity: i32) -> Listing {
    ListingRepo::create(pool, "Repaint a garden fence", "standard", capacity)
        .await
        .unwrap()
}

fn fp(raw: &str) -> Fingerprint {
    Fingerprint::parse(raw).unwrap()
}

async fn claim(pool: &PgPool, listing_id: i64, raw: &str) -> ClaimOutcome {
    ClaimRepo::claim_slot(pool, listing_id, &fp(raw), None)
        .await
        .unwrap()
        .expect("listing should exist")
}

async fn reload(pool: &PgPool, id: i64) -> Listing {
    ListingRepo::find_by_id(pool, id).await.unwrap().unwrap()
}

// ---------------------------------------------------------------------------
// Test: three distinct respondents fill a capacity-3 listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_distinct_respondents_fill_listing(pool: PgPool) {
    let listing = new_listing(&pool, 3).await;

    for (i, raw) in ["alice", "bob", "carol"].iter().enumerate() {
        let outcome = claim(&pool, listing.id, raw).await;
        assert_eq!(outcome.status, ClaimStatus::Ok);
        assert_eq!(outcome.consumed, i as i32 + 1);
        assert_eq!(outcome.capacity, 3);
    }

    let listing = reload(&pool, listing.id).await;
    assert_eq!(listing.consumed, 3);
    assert!(listing.filled_at.is_some(), "filled_at should be set once full");
    assert_eq!(listing.state_at(chrono::Utc::now()), ListingState::Full);
}

// ---------------------------------------------------------------------------
// Test: a fourth respondent is rejected by the hard cap
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_claim_beyond_capacity_is_rejected(pool: PgPool) {
    let listing = new_listing(&pool, 3).await;
    for raw in ["alice", "bob", "carol"] {
        claim(&pool, listing.id, raw).await;
    }

    let outcome = claim(&pool, listing.id, "dave").await;
    assert_eq!(
        outcome,
        ClaimOutcome {
            status: ClaimStatus::Full,
            consumed: 3,
            capacity: 3,
        }
    );

    let claims = ClaimRepo::list_by_listing(&pool, listing.id).await.unwrap();
    assert_eq!(claims.len(), 3);
    assert!(claims.iter().all(|c| c.respondent_fingerprint != "dave"));
    assert_eq!(reload(&pool, listing.id).await.consumed, 3);
}

// ---------------------------------------------------------------------------
// Test: a repeated claim is a no-op
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_claim_is_idempotent(pool: PgPool) {
    let listing = new_listing(&pool, 5).await;

    let first = claim(&pool, listing.id, "alice").await;
    assert_eq!(first.status, ClaimStatus::Ok);

    let before = reload(&pool, listing.id).await;
    let second = claim(&pool, listing.id, "alice").await;
    assert_eq!(second.status, ClaimStatus::AlreadyClaimed);
    assert_eq!(second.consumed, 1);

    let after = reload(&pool, listing.id).await;
    assert_eq!(after.consumed, 1);
    assert_eq!(after.updated_at, before.updated_at, "duplicate must not touch the listing");
    assert_eq!(ClaimRepo::list_by_listing(&pool, listing.id).await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: already-joined takes precedence over full
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_on_full_listing_reports_already_claimed(pool: PgPool) {
    let listing = new_listing(&pool, 1).await;
    claim(&pool, listing.id, "alice").await;

    let outcome = claim(&pool, listing.id, "alice").await;
    assert_eq!(outcome.status, ClaimStatus::AlreadyClaimed);
    assert_eq!(outcome.consumed, 1);
}

// ---------------------------------------------------------------------------
// Test: unknown listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_claim_unknown_listing_returns_none(pool: PgPool) {
    let result = ClaimRepo::claim_slot(&pool, 999_999, &fp("alice"), None)
        .await
        .unwrap();
    assert_matches!(result, None);
}

// ---------------------------------------------------------------------------
// Test: authenticated respondent id is stored alongside the fingerprint
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_claim_records_respondent_id(pool: PgPool) {
    let listing = new_listing(&pool, 2).await;
    ClaimRepo::claim_slot(&pool, listing.id, &fp("session-7"), Some(7))
        .await
        .unwrap();

    let claims = ClaimRepo::list_by_listing(&pool, listing.id).await.unwrap();
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0].respondent_id, Some(7));
    assert_eq!(claims[0].respondent_fingerprint, "session-7");
}

// ---------------------------------------------------------------------------
// Test: concurrent claims with one fingerprint produce one claim
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_same_fingerprint_claims_once(pool: PgPool) {
    const ATTEMPTS: usize = 8;
    let listing = new_listing(&pool, 5).await;
    let fingerprint = fp("racer");

    let outcomes = join_all(
        (0..ATTEMPTS).map(|_| ClaimRepo::claim_slot(&pool, listing.id, &fingerprint, None)),
    )
    .await;

    let statuses: Vec<ClaimStatus> = outcomes
        .into_iter()
        .map(|r| r.unwrap().unwrap().status)
        .collect();
    let ok = statuses.iter().filter(|s| **s == ClaimStatus::Ok).count();
    let dup = statuses
        .iter()
        .filter(|s| **s == ClaimStatus::AlreadyClaimed)
        .count();

    assert_eq!(ok, 1, "exactly one concurrent claim should win: {statuses:?}");
    assert_eq!(dup, ATTEMPTS - 1);
    assert_eq!(reload(&pool, listing.id).await.consumed, 1);
}

// ---------------------------------------------------------------------------
// Test: concurrent distinct respondents never overshoot capacity
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_distinct_claims_respect_capacity(pool: PgPool) {
    let listing = new_listing(&pool, 3).await;
    let fingerprints: Vec<Fingerprint> = (0..6).map(|i| fp(&format!("device-{i}"))).collect();

    let outcomes = join_all(
        fingerprints
            .iter()
            .map(|f| ClaimRepo::claim_slot(&pool, listing.id, f, None)),
    )
    .await;

    let statuses: Vec<ClaimStatus> = outcomes
        .into_iter()
        .map(|r| r.unwrap().unwrap().status)
        .collect();
    assert_eq!(statuses.iter().filter(|s| **s == ClaimStatus::Ok).count(), 3);
    assert_eq!(statuses.iter().filter(|s| **s == ClaimStatus::Full).count(), 3);

    let listing = reload(&pool, listing.id).await;
    assert_eq!(listing.consumed, 3);
    assert!(listing.filled_at.is_some());
}

// ---------------------------------------------------------------------------
// Test: filled_at is stamped once and never moves
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_filled_at_is_stable_after_fill(pool: PgPool) {
    let listing = new_listing(&pool, 2).await;
    claim(&pool, listing.id, "alice").await;
    assert!(reload(&pool, listing.id).await.filled_at.is_none());

    claim(&pool, listing.id, "bob").await;
    let filled_at = reload(&pool, listing.id).await.filled_at;
    assert!(filled_at.is_some());

    claim(&pool, listing.id, "carol").await;
    claim(&pool, listing.id, "alice").await;
    let listing = reload(&pool, listing.id).await;
    assert_eq!(listing.filled_at, filled_at);
    assert_eq!(listing.consumed, 2);
}
