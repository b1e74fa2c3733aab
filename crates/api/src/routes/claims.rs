//! Route definitions for slot claims and the dedup lookup.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::claim;
use crate::state::AppState;

/// Routes mounted at the `/api/v1` root.
///
/// ```text
/// POST   /claim               -> claim_slot
/// GET    /claimed-listings    -> list_claimed_listings (?fingerprint=&lookbackHours=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/claim", post(claim::claim_slot))
        .route("/claimed-listings", get(claim::list_claimed_listings))
}
