//! Handlers for slot claims and the dedup lookup.
//!
//! A claim that loses (duplicate or full listing) is not an error: it
//! answers 409 with the same body shape as a success and `ok: false`, so
//! the client can show "already joined" or "full" with the live counters.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use slotboard_core::claim::{resolve_lookback_hours, ClaimOutcome, ClaimStatus, Fingerprint};
use slotboard_core::error::CoreError;
use slotboard_core::types::DbId;
use slotboard_db::repositories::ClaimRepo;

use crate::error::AppResult;
use crate::query::RespondentParams;
use crate::state::AppState;

/// Request body for `POST /claim`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    pub listing_id: DbId,
    pub fingerprint: String,
    pub respondent_id: Option<DbId>,
}

/// Response body for `POST /claim`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    pub ok: bool,
    pub status: ClaimStatus,
    pub consumed: i32,
    pub capacity: i32,
}

impl From<ClaimOutcome> for ClaimResponse {
    fn from(outcome: ClaimOutcome) -> Self {
        Self {
            ok: outcome.status.is_ok(),
            status: outcome.status,
            consumed: outcome.consumed,
            capacity: outcome.capacity,
        }
    }
}

/// Response body for `GET /claimed-listings`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimedListingsResponse {
    pub listing_ids: Vec<DbId>,
}

/// POST /api/v1/claim
///
/// Claim one contact slot. 200 on success, 409 when the respondent already
/// holds a slot or the listing is full, 404 for an unknown listing.
pub async fn claim_slot(
    State(state): State<AppState>,
    Json(input): Json<ClaimRequest>,
) -> AppResult<(StatusCode, Json<ClaimResponse>)> {
    let fingerprint = Fingerprint::parse(&input.fingerprint)?;

    let outcome = ClaimRepo::claim_slot(
        &state.pool,
        input.listing_id,
        &fingerprint,
        input.respondent_id,
    )
    .await?
    .ok_or(CoreError::NotFound {
        entity: "Listing",
        id: input.listing_id,
    })?;

    let status = match outcome.status {
        ClaimStatus::Ok => StatusCode::OK,
        ClaimStatus::AlreadyClaimed | ClaimStatus::Full => StatusCode::CONFLICT,
    };

    tracing::info!(
        listing_id = input.listing_id,
        status = ?outcome.status,
        consumed = outcome.consumed,
        capacity = outcome.capacity,
        "Claim processed"
    );

    Ok((status, Json(outcome.into())))
}

/// GET /api/v1/claimed-listings?fingerprint=&lookbackHours=
///
/// Listings the respondent claimed within the lookback window. A missing
/// fingerprint yields an empty list whatever the lookback says.
pub async fn list_claimed_listings(
    State(state): State<AppState>,
    Query(params): Query<RespondentParams>,
) -> AppResult<Json<ClaimedListingsResponse>> {
    let listing_ids = claimed_listing_ids(&state, &params).await?;
    Ok(Json(ClaimedListingsResponse { listing_ids }))
}

/// Dedup lookup shared by the claimed-listings endpoint and the feed.
pub(crate) async fn claimed_listing_ids(
    state: &AppState,
    params: &RespondentParams,
) -> AppResult<Vec<DbId>> {
    let Some(fingerprint) = params.fingerprint() else {
        return Ok(Vec::new());
    };
    let lookback_hours =
        resolve_lookback_hours(params.lookback_hours, state.config.claim_lookback_hours)?;
    let ids = ClaimRepo::list_claimed_listing_ids(&state.pool, fingerprint, lookback_hours).await?;
    Ok(ids)
}
