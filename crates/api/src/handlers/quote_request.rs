//! Handlers for quote requests and reference assignment.
//!
//! A request whose reference could not be allocated keeps existing and
//! stays readable by id; `POST /assign-reference` can be retried later.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use slotboard_core::error::CoreError;
use slotboard_core::intake::validate_quote_request;
use slotboard_core::reference::is_well_formed;
use slotboard_core::types::{DbId, Timestamp};
use slotboard_db::models::quote_request::{CreateQuoteRequest, QuoteRequest, ReferenceAssignment};
use slotboard_db::repositories::{ListingRepo, QuoteRequestRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /quote-requests`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuoteRequestBody {
    pub listing_id: Option<DbId>,
    pub contact_name: String,
    pub message: Option<String>,
}

/// A quote request as presented to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequestView {
    pub id: DbId,
    pub listing_id: Option<DbId>,
    pub contact_name: String,
    pub message: Option<String>,
    pub reference: Option<String>,
    pub created_at: Timestamp,
}

impl From<QuoteRequest> for QuoteRequestView {
    fn from(r: QuoteRequest) -> Self {
        Self {
            id: r.id,
            listing_id: r.listing_id,
            contact_name: r.contact_name,
            message: r.message,
            reference: r.reference,
            created_at: r.created_at,
        }
    }
}

/// Request body for `POST /assign-reference`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignReferenceRequest {
    pub request_id: DbId,
}

/// Response body for `POST /assign-reference`.
#[derive(Debug, Serialize)]
pub struct AssignReferenceResponse {
    pub reference: String,
}

/// POST /api/v1/quote-requests
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateQuoteRequestBody>,
) -> AppResult<(StatusCode, Json<DataResponse<QuoteRequestView>>)> {
    validate_quote_request(&body.contact_name, body.message.as_deref())?;

    if let Some(listing_id) = body.listing_id {
        ListingRepo::find_by_id(&state.pool, listing_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Listing",
                id: listing_id,
            })?;
    }

    let input = CreateQuoteRequest {
        listing_id: body.listing_id,
        contact_name: body.contact_name,
        message: body.message,
    };
    let request = QuoteRequestRepo::create(&state.pool, &input).await?;
    tracing::info!(request_id = request.id, "Quote request created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: request.into(),
        }),
    ))
}

/// GET /api/v1/quote-requests/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<QuoteRequestView>>> {
    let request = QuoteRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "QuoteRequest",
            id,
        })?;
    Ok(Json(DataResponse {
        data: request.into(),
    }))
}

/// GET /api/v1/quote-requests/by-reference/{reference}
pub async fn get_by_reference(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> AppResult<Json<DataResponse<QuoteRequestView>>> {
    let reference = reference.trim().to_ascii_uppercase();
    if !is_well_formed(&reference) {
        return Err(AppError::BadRequest(format!(
            "'{reference}' is not a valid reference"
        )));
    }
    let request = QuoteRequestRepo::find_by_reference(&state.pool, &reference)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    Ok(Json(DataResponse {
        data: request.into(),
    }))
}

/// POST /api/v1/assign-reference
///
/// Idempotent: a request that already has a reference gets it back.
/// 404 for an unknown request, 503 when every candidate collided.
pub async fn assign_reference(
    State(state): State<AppState>,
    Json(input): Json<AssignReferenceRequest>,
) -> AppResult<Json<AssignReferenceResponse>> {
    let request_id = input.request_id;
    match QuoteRequestRepo::assign_reference(&state.pool, request_id).await? {
        ReferenceAssignment::Assigned(reference) => {
            Ok(Json(AssignReferenceResponse { reference }))
        }
        ReferenceAssignment::NotFound => Err(CoreError::NotFound {
            entity: "QuoteRequest",
            id: request_id,
        }
        .into()),
        ReferenceAssignment::Exhausted { attempts } => Err(CoreError::ReferenceExhausted {
            request_id,
            attempts,
        }
        .into()),
    }
}
