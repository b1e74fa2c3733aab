pub mod admin;
pub mod claims;
pub mod health;
pub mod listings;
pub mod quote_requests;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /claim                                   claim a slot (POST)
/// /claimed-listings                        dedup lookup (GET)
///
/// /listings                                feed, create
/// /listings/{id}                           get with derived state
///
/// /quote-requests                          create
/// /quote-requests/{id}                     get
/// /quote-requests/by-reference/{reference} get by reference
/// /assign-reference                        assign reference (POST)
///
/// /admin/sweep                             run expiry sweep (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(claims::router())
        .merge(quote_requests::reference_router())
        .nest("/listings", listings::router())
        .nest("/quote-requests", quote_requests::router())
        .nest("/admin", admin::router())
}
