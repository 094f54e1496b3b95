use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::analysis::client::DEFAULT_ANALYSIS_URL;
use crate::analysis::RetryPolicy;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Holds `user.json`, `users.json`, `interviewRooms.json` and `resumes/`.
    pub data_dir: PathBuf,
    /// Keep accounts and rooms in memory only; nothing survives a restart.
    pub ephemeral_storage: bool,
    pub analysis_url: String,
    pub analysis_max_attempts: u32,
    pub analysis_backoff: Duration,
    /// `None` keeps the HTTP client's default.
    pub analysis_timeout: Option<Duration>,
    pub max_upload_bytes: usize,
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("./data"),
            ephemeral_storage: false,
            analysis_url: DEFAULT_ANALYSIS_URL.to_string(),
            analysis_max_attempts: 1,
            analysis_backoff: Duration::from_millis(500),
            analysis_timeout: None,
            max_upload_bytes: 10 * 1024 * 1024,
            host: "127.0.0.1".to_string(),
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            ephemeral_storage: parse_env("EPHEMERAL_STORAGE")?
                .unwrap_or(defaults.ephemeral_storage),
            analysis_url: std::env::var("ANALYSIS_URL").unwrap_or(defaults.analysis_url),
            analysis_max_attempts: parse_env("ANALYSIS_MAX_ATTEMPTS")?
                .unwrap_or(defaults.analysis_max_attempts),
            analysis_backoff: parse_env("ANALYSIS_BACKOFF_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.analysis_backoff),
            analysis_timeout: parse_env("ANALYSIS_TIMEOUT_SECS")?.map(Duration::from_secs),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES")?.unwrap_or(defaults.max_upload_bytes),
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: parse_env("PORT")?.unwrap_or(defaults.port),
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.analysis_max_attempts.max(1),
            base_delay: self.analysis_backoff,
        }
    }

    pub fn resumes_dir(&self) -> PathBuf {
        self.data_dir.join("resumes")
    }
}

/// Parses an optional variable; unset is `None`, unparsable is an error.
fn parse_env<T: FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_keep_single_attempt() {
        let config = Config::default();
        assert_eq!(config.retry_policy(), RetryPolicy::single_attempt());
        assert_eq!(config.analysis_url, DEFAULT_ANALYSIS_URL);
        assert_eq!(config.resumes_dir(), PathBuf::from("./data/resumes"));
    }

    #[test]
    fn test_zero_attempts_still_sends_once() {
        let config = Config {
            analysis_max_attempts: 0,
            ..Config::default()
        };
        assert_eq!(config.retry_policy().max_attempts, 1);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("PREP_API_TEST_PORT", "eighty");
        assert!(parse_env::<u16>("PREP_API_TEST_PORT").is_err());
        std::env::set_var("PREP_API_TEST_PORT", " 9000 ");
        assert_eq!(parse_env::<u16>("PREP_API_TEST_PORT").unwrap(), Some(9000));
        std::env::remove_var("PREP_API_TEST_PORT");
        assert_eq!(parse_env::<u16>("PREP_API_TEST_PORT").unwrap(), None);
    }
}
