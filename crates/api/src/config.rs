use slotboard_core::claim::DEFAULT_LOOKBACK_HOURS;
use slotboard_core::sweep::{validate_grace_hours, DEFAULT_GRACE_HOURS};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long a full listing stays visible before the sweep withdraws it.
    pub grace_hours: i64,
    /// Interval of the in-process expiry sweep; `0` disables it.
    pub sweep_interval_secs: u64,
    /// Dedup lookback used when a request omits `lookbackHours`.
    pub claim_lookback_hours: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `LISTING_GRACE_HOURS`  | `72` (at most 876000)      |
    /// | `SWEEP_INTERVAL_SECS`  | `3600`                     |
    /// | `CLAIM_LOOKBACK_HOURS` | `720`                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let grace_hours: i64 = std::env::var("LISTING_GRACE_HOURS")
            .map(|v| v.parse().expect("LISTING_GRACE_HOURS must be a valid i64"))
            .unwrap_or(DEFAULT_GRACE_HOURS);
        let grace_hours = validate_grace_hours(grace_hours)
            .unwrap_or_else(|e| panic!("Invalid LISTING_GRACE_HOURS: {e}"));

        let sweep_interval_secs: u64 = std::env::var("SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("SWEEP_INTERVAL_SECS must be a valid u64");

        let claim_lookback_hours: i64 = std::env::var("CLAIM_LOOKBACK_HOURS")
            .map(|v| v.parse().expect("CLAIM_LOOKBACK_HOURS must be a valid i64"))
            .unwrap_or(DEFAULT_LOOKBACK_HOURS);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            grace_hours,
            sweep_interval_secs,
            claim_lookback_hours,
        }
    }
}
