//! Periodic withdrawal of full listings past their grace period.
//!
//! Deployments that drive the sweep from an external scheduler run the
//! `slotboard-worker` binary instead and set `SWEEP_INTERVAL_SECS=0`.
//! Running both is harmless: the sweep is idempotent.

use std::time::Duration;

use chrono::Utc;
use slotboard_db::repositories::ListingRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Run the expiry sweep loop until `cancel` is triggered.
pub async fn run(pool: PgPool, grace_hours: i64, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        grace_hours,
        interval_secs = interval.as_secs(),
        "Listing expiry job started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Listing expiry job stopping");
                break;
            }
            _ = ticker.tick() => {
                let now = Utc::now();
                match ListingRepo::run_sweep(&pool, now, grace_hours, false).await {
                    Ok(report) if report.count > 0 => {
                        tracing::info!(
                            cutoff = %report.cutoff,
                            expired_count = report.count,
                            ttl_hours = report.ttl_hours,
                            "Listing expiry: withdrew full listings"
                        );
                    }
                    Ok(report) => {
                        tracing::debug!(cutoff = %report.cutoff, "Listing expiry: nothing due");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Listing expiry: sweep failed");
                    }
                }
            }
        }
    }
}
