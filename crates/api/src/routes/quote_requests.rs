//! Route definitions for quote requests and reference assignment.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::quote_request;
use crate::state::AppState;

/// Routes mounted at `/quote-requests`.
///
/// ```text
/// POST   /                          -> create
/// GET    /{id}                      -> get_by_id
/// GET    /by-reference/{reference}  -> get_by_reference
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(quote_request::create))
        .route("/{id}", get(quote_request::get_by_id))
        .route("/by-reference/{reference}", get(quote_request::get_by_reference))
}

/// Routes mounted at the `/api/v1` root.
///
/// ```text
/// POST   /assign-reference          -> assign_reference
/// ```
pub fn reference_router() -> Router<AppState> {
    Router::new().route("/assign-reference", post(quote_request::assign_reference))
}
