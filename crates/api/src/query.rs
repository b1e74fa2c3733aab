//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped with `slotboard_core::pagination`.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Respondent filter (`?fingerprint=&lookbackHours=`).
///
/// A missing or blank fingerprint means "no respondent".
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondentParams {
    pub fingerprint: Option<String>,
    pub lookback_hours: Option<i64>,
}

impl RespondentParams {
    /// The trimmed fingerprint, or `None` when absent or blank.
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
