//! One-shot expiry sweep, meant to be run from cron or a scheduler.
//!
//! The API process can also sweep on an interval; this binary exists for
//! deployments that keep background work out of the request-serving
//! process.

use anyhow::Context;
use chrono::Utc;
use slotboard_core::sweep::{sweep_cutoff, validate_grace_hours, SweepReport, DEFAULT_GRACE_HOURS};
use slotboard_db::repositories::ListingRepo;
use slotboard_db::DbPool;

/// Settings for a single sweep run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepJobConfig {
    pub database_url: String,
    pub grace_hours: i64,
    pub dry_run: bool,
}

impl SweepJobConfig {
    /// Read settings from the environment and command-line arguments.
    ///
    /// | Source                | Default |
    /// |-----------------------|---------|
    /// | `DATABASE_URL`        | required |
    /// | `LISTING_GRACE_HOURS` | `72`    |
    /// | `SWEEP_DRY_RUN`       | `false` |
    /// | `--dry-run` argument  | off     |
    pub fn from_env_and_args<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let grace_hours = parse_grace_hours(std::env::var("LISTING_GRACE_HOURS").ok().as_deref())?;
        let dry_run = parse_flag(std::env::var("SWEEP_DRY_RUN").ok().as_deref())
            || args.into_iter().any(|a| a == "--dry-run");

        Ok(Self {
            database_url,
            grace_hours,
            dry_run,
        })
    }
}

fn parse_grace_hours(raw: Option<&str>) -> anyhow::Result<i64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_GRACE_HOURS);
    };
    let hours: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("LISTING_GRACE_HOURS must be an integer, got '{raw}'"))?;
    validate_grace_hours(hours).context("LISTING_GRACE_HOURS is out of range")
}

fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|s| s.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes")
    )
}

/// Run one sweep and emit its summary as a single log line.
///
/// On failure the cutoff that was in effect is logged before the error
/// is returned, so an operator can tell which rows were targeted.
pub async fn run_once(pool: &DbPool, grace_hours: i64, dry_run: bool) -> anyhow::Result<SweepReport> {
    let now = Utc::now();
    match ListingRepo::run_sweep(pool, now, grace_hours, dry_run).await {
        Ok(report) => {
            if report.dry_run {
                tracing::info!(
                    cutoff = %report.cutoff,
                    would_close_count = report.count,
                    ttl_hours = report.ttl_hours,
                    "Listing expiry sweep (dry run)"
                );
            } else {
                tracing::info!(
                    cutoff = %report.cutoff,
                    expired_count = report.count,
                    ttl_hours = report.ttl_hours,
                    "Listing expiry sweep"
                );
            }
            Ok(report)
        }
        Err(e) => {
            let cutoff = sweep_cutoff(now, grace_hours)
                .map_or_else(|| "out of range".to_string(), |c| c.to_rfc3339());
            let intended = ListingRepo::count_expirable(pool, now, grace_hours).await.ok();
            tracing::error!(
                cutoff = %cutoff,
                intended_count = ?intended,
                ttl_hours = grace_hours,
                error = %e,
                "Listing expiry sweep failed"
            );
            Err(e).context("listing expiry sweep failed")
        }
    }
}

#[cfg(test)]
mod tests {
    use slotboard_core::sweep::MAX_GRACE_HOURS;

    use super::*;

    #[test]
    fn grace_hours_defaults_when_unset() {
        assert_eq!(parse_grace_hours(None).unwrap(), DEFAULT_GRACE_HOURS);
    }

    #[test]
    fn grace_hours_parses_and_rejects_garbage() {
        assert_eq!(parse_grace_hours(Some(" 24 ")).unwrap(), 24);
        assert!(parse_grace_hours(Some("soon")).is_err());
        assert!(parse_grace_hours(Some("-1")).is_err());
    }

    #[test]
    fn grace_hours_beyond_a_century_are_rejected() {
        assert_eq!(parse_grace_hours(Some("876000")).unwrap(), MAX_GRACE_HOURS);
        assert!(parse_grace_hours(Some("876001")).is_err());
        assert!(parse_grace_hours(Some("3000000000000000")).is_err());
    }

    #[test]
    fn dry_run_flag_values() {
        assert!(parse_flag(Some("true")));
        assert!(parse_flag(Some("1")));
        assert!(parse_flag(Some("YES")));
        assert!(!parse_flag(Some("0")));
        assert!(!parse_flag(None));
    }
}
