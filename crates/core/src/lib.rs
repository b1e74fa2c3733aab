//! Domain logic for the slotboard listing marketplace.
//!
//! This crate has no database or HTTP dependencies. Everything here is
//! pure and deterministic (apart from the seed jitter in [`reference`]) so
//! the persistence layer, the API server and the sweep worker can share it.

pub mod claim;
pub mod error;
pub mod intake;
pub mod lifecycle;
pub mod listing;
pub mod pagination;
pub mod reference;
pub mod sweep;
pub mod types;
