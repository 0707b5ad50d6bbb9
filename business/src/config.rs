use std::env::vars;
use std::time::Duration;

use anyhow::{Context as _, bail};
use log::info;
use serde::Deserialize;

pub const DEFAULT_USERS_URL: &str = "https://jsonplaceholder.typicode.com/users";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(8000);

/// Where the user table is loaded from and how long a load may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    users_url: String,
    timeout: Duration,
}

#[derive(Deserialize)]
struct RawConfig {
    people_users_url: Option<String>,
    people_timeout_ms: Option<u64>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            users_url: DEFAULT_USERS_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl LoaderConfig {
    pub fn new(users_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            users_url: users_url.into(),
            timeout,
        }
    }

    pub fn users_url(&self) -> &str {
        &self.users_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn with_users_url(mut self, users_url: impl Into<String>) -> Self {
        self.users_url = users_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads `PEOPLE_USERS_URL` and `PEOPLE_TIMEOUT_MS`, falling back to defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        info!("Loading loader configuration from environment variables");

        let raw: RawConfig =
            serde_env::from_iter(vars()).context("Failed to read loader configuration")?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> anyhow::Result<Self> {
        let RawConfig {
            people_users_url,
            people_timeout_ms,
        } = raw;

        let users_url = match people_users_url {
            Some(url) if url.trim().is_empty() => bail!("PEOPLE_USERS_URL must not be empty"),
            Some(url) => {
                info!("Using provided PEOPLE_USERS_URL: {url}");
                url
            }
            None => DEFAULT_USERS_URL.to_owned(),
        };

        let timeout = match people_timeout_ms {
            Some(0) => bail!("PEOPLE_TIMEOUT_MS must be greater than zero"),
            Some(ms) => Duration::from_millis(ms),
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self { users_url, timeout })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_env::from_iter;

    #[test]
    fn test_defaults() {
        let config = LoaderConfig::default();
        assert_eq!(config.users_url(), DEFAULT_USERS_URL);
        assert_eq!(config.timeout(), Duration::from_millis(8000));
    }

    #[test]
    fn test_defaults_when_env_is_silent() {
        let raw: RawConfig =
            from_iter(vec![("HOME", "/root")]).expect("RawConfig should deserialize");
        let config = LoaderConfig::from_raw(raw).expect("empty env should build");
        assert_eq!(config, LoaderConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let raw: RawConfig = from_iter(vec![
            ("PEOPLE_USERS_URL", "http://localhost:9000/users"),
            ("PEOPLE_TIMEOUT_MS", "250"),
        ])
        .expect("RawConfig should deserialize");

        let config = LoaderConfig::from_raw(raw).expect("overrides should build");
        assert_eq!(config.users_url(), "http://localhost:9000/users");
        assert_eq!(config.timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let raw: RawConfig =
            from_iter(vec![("PEOPLE_TIMEOUT_MS", "0")]).expect("RawConfig should deserialize");

        let err = LoaderConfig::from_raw(raw).unwrap_err().to_string();
        assert!(err.contains("PEOPLE_TIMEOUT_MS"), "unexpected error: {err}");
    }

    #[test]
    fn test_builders() {
        let config = LoaderConfig::default()
            .with_users_url("http://example.test/users")
            .with_timeout(Duration::from_secs(1));
        assert_eq!(
            config,
            LoaderConfig::new("http://example.test/users", Duration::from_secs(1))
        );
    }
}
