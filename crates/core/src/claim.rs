//! Respondent identity and claim outcomes.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum accepted fingerprint length in bytes.
pub const MAX_FINGERPRINT_LENGTH: usize = 128;

/// Lookback window used by the dedup lookup when the caller omits one (30 days).
pub const DEFAULT_LOOKBACK_HOURS: i64 = 720;

/// Largest lookback window a caller may request (1 year).
pub const MAX_LOOKBACK_HOURS: i64 = 24 * 365;

// ---------------------------------------------------------------------------
// Fingerprint
// ---------------------------------------------------------------------------

/// Opaque identity string used to deduplicate claims from one respondent.
///
/// It may come from an anonymous device token or from an authenticated
/// session; the allocator does not care which. Construction trims
/// surrounding whitespace so `" abc"` and `"abc"` cannot claim twice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Validation("Fingerprint must not be empty".into()));
        }
        if trimmed.len() > MAX_FINGERPRINT_LENGTH {
            return Err(CoreError::Validation(format!(
                "Fingerprint must be at most {MAX_FINGERPRINT_LENGTH} bytes"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Fingerprint> for String {
    fn from(value: Fingerprint) -> Self {
        value.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Claim outcome
// ---------------------------------------------------------------------------

/// Result status of a slot claim.
///
/// Capacity is a hard cap: a claim against a listing whose every slot is
/// already taken is rejected with `Full` and leaves no trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    Ok,
    AlreadyClaimed,
    Full,
}

impl ClaimStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Status plus the listing counters observed by the claim transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClaimOutcome {
    pub status: ClaimStatus,
    pub consumed: i32,
    pub capacity: i32,
}

// ---------------------------------------------------------------------------
// Lookback
// ---------------------------------------------------------------------------

/// Resolve a caller-supplied lookback window in hours.
///
/// `None` falls back to `default_hours`; negative values are rejected and
/// anything above [`MAX_LOOKBACK_HOURS`] is clamped.
pub fn resolve_lookback_hours(requested: Option<i64>, default_hours: i64) -> Result<i64, CoreError> {
    match requested {
        None => Ok(default_hours.clamp(0, MAX_LOOKBACK_HOURS)),
        Some(h) if h < 0 => Err(CoreError::Validation(format!(
            "lookbackHours must not be negative, got {h}"
        ))),
        Some(h) => Ok(h.min(MAX_LOOKBACK_HOURS)),
    }
}
