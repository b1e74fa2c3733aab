//! Listing tiers and creation rules.
//!
//! The tier only influences the default capacity and how prominently the
//! feed weights a listing. Allocation treats every tier identically.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const TIER_STANDARD: &str = "standard";
pub const TIER_QUICKWIN: &str = "quickwin";
pub const TIER_PRIORITY: &str = "priority";

/// All valid tier strings (must match the CHECK constraint on `listings.tier`).
pub const VALID_TIERS: &[&str] = &[TIER_STANDARD, TIER_QUICKWIN, TIER_PRIORITY];

/// Upper bound on an explicitly requested capacity.
pub const MAX_CAPACITY: i32 = 100;

/// Maximum title length in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingTier {
    #[default]
    Standard,
    QuickWin,
    Priority,
}

impl ListingTier {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            TIER_STANDARD => Ok(Self::Standard),
            TIER_QUICKWIN => Ok(Self::QuickWin),
            TIER_PRIORITY => Ok(Self::Priority),
            _ => Err(format!(
                "Invalid listing tier '{s}'. Must be one of: {}",
                VALID_TIERS.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => TIER_STANDARD,
            Self::QuickWin => TIER_QUICKWIN,
            Self::Priority => TIER_PRIORITY,
        }
    }

    /// Capacity applied when the poster does not choose one.
    pub fn default_capacity(&self) -> i32 {
        match self {
            Self::Standard => 4,
            Self::QuickWin => 3,
            Self::Priority => 6,
        }
    }

    /// Relative feed weight; higher sorts earlier among equally fresh listings.
    pub fn display_weight(&self) -> i32 {
        match self {
            Self::Standard => 1,
            Self::QuickWin => 2,
            Self::Priority => 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a listing title: non-blank and at most [`MAX_TITLE_LENGTH`] chars.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Listing title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Listing title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Resolve the capacity for a new listing, falling back to the tier default.
pub fn resolve_capacity(tier: ListingTier, requested: Option<i32>) -> Result<i32, CoreError> {
    match requested {
        None => Ok(tier.default_capacity()),
        Some(c) if (1..=MAX_CAPACITY).contains(&c) => Ok(c),
        Some(c) => Err(CoreError::Validation(format!(
            "Capacity must be between 1 and {MAX_CAPACITY}, got {c}"
        ))),
    }
}
