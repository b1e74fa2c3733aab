pub mod claim;
pub mod listing;
pub mod quote_request;
pub mod sweep;
