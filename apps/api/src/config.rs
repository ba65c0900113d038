use thiserror::Error;

use crate::oracle::{DEFAULT_API_BASE, DEFAULT_MODEL};

/// Startup configuration failures. Any of these halts the process before the
/// listener is bound.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required environment variable '{0}' is not set")]
    MissingVar(&'static str),

    #[error("Environment variable '{key}' is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub oracle_timeout_secs: u64,
    pub max_upload_bytes: usize,
    pub port: u16,
    /// Sessions untouched for this long are discarded.
    pub session_idle_minutes: u32,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let google_api_key = lookup("GOOGLE_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar("GOOGLE_API_KEY"))?;

        let max_upload_mb: usize = parse_or(&lookup, "MAX_UPLOAD_MB", 20)?;
        let max_upload_bytes =
            max_upload_mb
                .checked_mul(1024 * 1024)
                .ok_or_else(|| ConfigError::Invalid {
                    key: "MAX_UPLOAD_MB",
                    reason: format!("{max_upload_mb} MB does not fit in memory"),
                })?;

        Ok(Config {
            google_api_key,
            gemini_model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_api_base: lookup("GEMINI_API_BASE")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            oracle_timeout_secs: parse_or(&lookup, "ORACLE_TIMEOUT_SECS", 120)?,
            max_upload_bytes,
            port: parse_or(&lookup, "PORT", 8080)?,
            session_idle_minutes: parse_or(&lookup, "SESSION_IDLE_MINUTES", 60)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
    }
}
