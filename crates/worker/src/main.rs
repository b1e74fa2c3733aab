use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slotboard_worker::{run_once, SweepJobConfig};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slotboard_worker=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = ?e, "Worker exiting with failure");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config = SweepJobConfig::from_env_and_args(std::env::args().skip(1))?;
    let pool = slotboard_db::create_pool(&config.database_url).await?;
    slotboard_db::health_check(&pool).await?;
    run_once(&pool, config.grace_hours, config.dry_run).await?;
    pool.close().await;
    Ok(())
}
