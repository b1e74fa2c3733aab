//! Route definitions for operator endpoints.

use axum::routing::post;
use axum::Router;

use crate::handlers::sweep;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// POST   /sweep    -> run_sweep ({ "dryRun": bool })
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/sweep", post(sweep::run_sweep))
}
