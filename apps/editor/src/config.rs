use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::editor::session::SessionSettings;

/// Application configuration loaded from environment variables.
/// Every variable has a default except `DOWNLOAD_DIR`, which stays unset.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub port: u16,
    pub rust_log: String,
    pub debounce: Duration,
    pub notice_ttl: Duration,
    pub download_dir: Option<PathBuf>,
    /// Sessions untouched this long are unmounted.
    pub session_idle: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            backend_url: env_or("BACKEND_URL", "https://api.cvswitch.com"),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            debounce: millis("DEBOUNCE_MS", 300)?,
            notice_ttl: millis("NOTICE_TTL_MS", 2000)?,
            download_dir: std::env::var_os("DOWNLOAD_DIR")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            session_idle: Duration::from_secs(
                env_or("SESSION_IDLE_MINUTES", "60")
                    .parse::<u64>()
                    .context("SESSION_IDLE_MINUTES must be a whole number of minutes")?
                    * 60,
            ),
        })
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            debounce: self.debounce,
            notice_ttl: self.notice_ttl,
            download_dir: self.download_dir.clone(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn millis(key: &str, default: u64) -> Result<Duration> {
    let ms = match std::env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("{key} must be a whole number of milliseconds"))?,
        Err(_) => default,
    };
    Ok(Duration::from_millis(ms))
}
