//! Human-readable request references.
//!
//! A reference looks like `QR-7K2M-0042`: a constant prefix followed by
//! eight characters built from two seeds. The tail of the request's
//! creation time (whole seconds, base-36) supplies the first part and the
//! trailing alphanumerics of the request id supply the second. The code is
//! deterministic for a given seed pair, so collisions between requests are
//! resolved by the persistence layer retrying with a jittered time seed.

use rand::Rng;

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const REFERENCE_PREFIX: &str = "QR";

pub const REFERENCE_SEPARATOR: char = '-';

/// Width of the zero-padded base-36 time seed.
const TIME_SEED_WIDTH: usize = 7;

/// Width of the id seed.
const ID_SEED_WIDTH: usize = 4;

/// Characters kept after concatenating both seeds.
pub const CODE_LENGTH: usize = 8;

/// Attempts made to store a unique reference before giving up.
pub const MAX_REFERENCE_ATTEMPTS: u32 = 3;

/// Upper bound of the random offset applied to the time seed on retries.
pub const MAX_JITTER_SECS: i64 = 86_400;

const BASE36_DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// Build the reference for a request.
///
/// `jitter_secs` is added to the creation time before encoding; pass `0`
/// for the first attempt.
pub fn build_reference(created_at: Timestamp, request_id: DbId, jitter_secs: i64) -> String {
    let seconds = created_at.timestamp().saturating_add(jitter_secs).max(0) as u64;
    let time_seed = fit_width(&to_base36(seconds), TIME_SEED_WIDTH);
    let id_seed = fit_width(&id_alphanumerics(&request_id.to_string()), ID_SEED_WIDTH);

    let combined = format!("{time_seed}{id_seed}");
    let code = &combined[combined.len() - CODE_LENGTH..];
    let (head, tail) = code.split_at(CODE_LENGTH / 2);

    format!("{REFERENCE_PREFIX}{REFERENCE_SEPARATOR}{head}{REFERENCE_SEPARATOR}{tail}")
}

/// Time seed offset for the given zero-based attempt.
///
/// The first attempt is unperturbed so the happy path is reproducible.
pub fn jitter_for_attempt(attempt: u32) -> i64 {
    if attempt == 0 {
        0
    } else {
        rand::rng().random_range(1..=MAX_JITTER_SECS)
    }
}

/// Whether `s` has the shape produced by [`build_reference`].
pub fn is_well_formed(s: &str) -> bool {
    let mut parts = s.split(REFERENCE_SEPARATOR);
    let (Some(prefix), Some(head), Some(tail), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    prefix == REFERENCE_PREFIX
        && head.len() == CODE_LENGTH / 2
        && tail.len() == CODE_LENGTH / 2
        && head
            .chars()
            .chain(tail.chars())
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

fn id_alphanumerics(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Keep the trailing `width` characters, left-padding with `0` when short.
fn fit_width(s: &str, width: usize) -> String {
    if s.len() >= width {
        s[s.len() - width..].to_string()
    } else {
        format!("{s:0>width$}")
    }
}
