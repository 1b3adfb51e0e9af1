use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Endpoint of the HTML→PDF export service. Exports fail with
    /// `ServiceUnavailable` when unset.
    pub export_service_url: Option<String>,
    pub export_timeout: Duration,
    /// Sessions untouched for this long are evicted.
    pub session_idle_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            export_service_url: optional_env("EXPORT_SERVICE_URL"),
            export_timeout: Duration::from_secs(
                std::env::var("EXPORT_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse::<u64>()
                    .context("EXPORT_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            session_idle_timeout: Duration::from_secs(
                std::env::var("SESSION_IDLE_SECS")
                    .unwrap_or_else(|_| "3600".to_string())
                    .parse::<u64>()
                    .context("SESSION_IDLE_SECS must be a whole number of seconds")?,
            ),
        })
    }

    /// How often idle sessions are swept: the idle timeout, capped at a minute.
    pub fn session_sweep_interval(&self) -> Duration {
        self.session_idle_timeout
            .min(Duration::from_secs(60))
            .max(Duration::from_secs(1))
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
