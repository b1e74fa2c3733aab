//! Liveness and readiness probe for load balancers and operators.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Payload of `GET /health`.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when the database answers, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Whether this process runs the periodic expiry sweep itself.
    pub sweep_enabled: bool,
    /// Hours a full listing stays visible before it is withdrawn.
    pub grace_hours: i64,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = slotboard_db::health_check(&state.pool).await.is_ok();
    if !db_healthy {
        tracing::warn!("Health check: database unreachable");
    }

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        sweep_enabled: state.config.sweep_interval_secs > 0,
        grace_hours: state.config.grace_hours,
    })
}

/// `/health`, mounted at the root rather than under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
