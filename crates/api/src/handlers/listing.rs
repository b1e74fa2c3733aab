//! Handlers for the `/listings` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use slotboard_core::error::CoreError;
use slotboard_core::lifecycle::{fill_pct, ListingState};
use slotboard_core::listing::{resolve_capacity, validate_title, ListingTier};
use slotboard_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use slotboard_core::sweep::{is_visible, withdrawal_due_at};
use slotboard_core::types::{DbId, Timestamp};
use slotboard_db::models::listing::{CreateListing, Listing};
use slotboard_db::repositories::ListingRepo;

use crate::error::AppResult;
use crate::handlers::claim::claimed_listing_ids;
use crate::query::{PaginationParams, RespondentParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// A listing as presented to clients, with its derived display fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingView {
    pub id: DbId,
    pub title: String,
    pub tier: ListingTier,
    pub display_weight: i32,
    pub capacity: i32,
    pub consumed: i32,
    pub fill_pct: u8,
    pub state: ListingState,
    pub visible: bool,
    pub filled_at: Option<Timestamp>,
    pub withdrawal_due_at: Option<Timestamp>,
    pub visible_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ListingView {
    pub fn new(listing: Listing, now: Timestamp, grace_hours: i64) -> Self {
        let tier = listing.tier();
        let state = listing.state_at(now);
        Self {
            id: listing.id,
            display_weight: tier.display_weight(),
            tier,
            capacity: listing.capacity,
            consumed: listing.consumed,
            fill_pct: fill_pct(listing.capacity, listing.consumed),
            state,
            visible: is_visible(listing.visible_until, now),
            filled_at: listing.filled_at,
            withdrawal_due_at: withdrawal_due_at(listing.filled_at, grace_hours),
            visible_until: listing.visible_until,
            created_at: listing.created_at,
            updated_at: listing.updated_at,
            title: listing.title,
        }
    }
}

/// POST /api/v1/listings
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateListing>,
) -> AppResult<(StatusCode, Json<DataResponse<ListingView>>)> {
    validate_title(&input.title)?;
    let capacity = resolve_capacity(input.tier, input.capacity)?;

    let listing =
        ListingRepo::create(&state.pool, input.title.trim(), input.tier.as_str(), capacity)
            .await?;
    tracing::info!(listing_id = listing.id, capacity, tier = input.tier.as_str(), "Listing created");

    let view = ListingView::new(listing, Utc::now(), state.config.grace_hours);
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

/// GET /api/v1/listings/{id}
///
/// Returns the listing whether or not it is still visible; `visible`
/// tells the caller which.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ListingView>>> {
    let listing = ListingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Listing",
            id,
        })?;
    let view = ListingView::new(listing, Utc::now(), state.config.grace_hours);
    Ok(Json(DataResponse { data: view }))
}

/// GET /api/v1/listings
///
/// Public feed of visible listings, newest first. With a fingerprint,
/// listings that respondent already claimed are left out.
pub async fn list_feed(
    State(state): State<AppState>,
    Query(respondent): Query<RespondentParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<ListingView>>>> {
    let exclude = claimed_listing_ids(&state, &respondent).await?;
    let limit = clamp_limit(page.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(page.offset);

    let listings = ListingRepo::list_visible(&state.pool, &exclude, limit, offset).await?;

    let now = Utc::now();
    let views = listings
        .into_iter()
        .map(|l| ListingView::new(l, now, state.config.grace_hours))
        .collect();
    Ok(Json(DataResponse { data: views }))
}
