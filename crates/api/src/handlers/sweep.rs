//! Handler for the operator-triggered expiry sweep.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use slotboard_core::sweep::SweepReport;
use slotboard_db::repositories::ListingRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /admin/sweep`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepRequest {
    #[serde(default)]
    pub dry_run: bool,
}

/// POST /api/v1/admin/sweep
///
/// Run the expiry sweep now with the configured grace period.
pub async fn run_sweep(
    State(state): State<AppState>,
    Json(input): Json<SweepRequest>,
) -> AppResult<Json<DataResponse<SweepReport>>> {
    let report = ListingRepo::run_sweep(
        &state.pool,
        Utc::now(),
        state.config.grace_hours,
        input.dry_run,
    )
    .await?;

    tracing::info!(
        cutoff = %report.cutoff,
        count = report.count,
        ttl_hours = report.ttl_hours,
        dry_run = report.dry_run,
        "Manual expiry sweep finished"
    );

    Ok(Json(DataResponse { data: report }))
}
