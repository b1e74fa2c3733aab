//! Row models and DTOs, one module per table.

pub mod claim;
pub mod listing;
pub mod quote_request;
