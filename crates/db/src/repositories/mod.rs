//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod claim_repo;
pub mod listing_repo;
pub mod quote_request_repo;

pub use claim_repo::ClaimRepo;
pub use listing_repo::ListingRepo;
pub use quote_request_repo::QuoteRequestRepo;
