//! Route definitions for the `/listings` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::listing;
use crate::state::AppState;

/// Routes mounted at `/listings`.
///
/// ```text
/// GET    /        -> list_feed (?fingerprint=&lookbackHours=&limit=&offset=)
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(listing::list_feed).post(listing::create))
        .route("/{id}", get(listing::get_by_id))
}
