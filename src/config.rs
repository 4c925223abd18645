//! Runtime configuration for the console core. Values come from environment
//! variables with sensible defaults so a packaged shell can point the console
//! at another deployment without rebuilding. Configuration values are public;
//! do not store secrets here.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

/// Name of the durable credential file, the single fixed key of the store.
pub const TOKEN_FILE_NAME: &str = "dormitory_admin_token";

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_IDENTITY_TIMEOUT: Duration = Duration::from_secs(8);

/// Console configuration derived from the environment.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Base URL every API path is joined onto.
    pub api_base_url: String,
    /// Whole-request timeout applied by the transport.
    pub request_timeout: Duration,
    /// Connection-establishment timeout applied by the transport.
    pub connect_timeout: Duration,
    /// Bounded wait the navigation guard grants identity resolution. Shorter
    /// than the request timeout on purpose: the guard gives up and demotes to
    /// logged-out while the underlying fetch keeps running.
    pub identity_timeout: Duration,
    /// Location of the persisted credential.
    pub token_path: PathBuf,
}

impl AppConfig {
    /// Loads configuration, applying `DORM_CONSOLE_*` environment overrides.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(value) = env_value("DORM_CONSOLE_API_URL") {
            config.api_base_url = value;
        }
        if let Some(value) = env_value("DORM_CONSOLE_TOKEN_FILE") {
            config.token_path = PathBuf::from(value);
        }
        if let Some(value) = env_value("DORM_CONSOLE_REQUEST_TIMEOUT_MS") {
            match value.parse::<u64>() {
                Ok(millis) => config.request_timeout = Duration::from_millis(millis),
                Err(_) => warn!("ignoring invalid DORM_CONSOLE_REQUEST_TIMEOUT_MS: {value}"),
            }
        }
        if let Some(value) = env_value("DORM_CONSOLE_IDENTITY_TIMEOUT_MS") {
            match value.parse::<u64>() {
                Ok(millis) => config.identity_timeout = Duration::from_millis(millis),
                Err(_) => warn!("ignoring invalid DORM_CONSOLE_IDENTITY_TIMEOUT_MS: {value}"),
            }
        }

        config
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            identity_timeout: DEFAULT_IDENTITY_TIMEOUT,
            token_path: default_token_path(),
        }
    }
}

fn default_token_path() -> PathBuf {
    let base = env::var_os("HOME").map_or_else(|| PathBuf::from("."), PathBuf::from);
    base.join(".dormitory-console").join(TOKEN_FILE_NAME)
}

/// Reads an environment variable, treating unset, empty, and blank as absent.
fn env_value(name: &str) -> Option<String> {
    let value = env::var(name).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_uses_defaults_without_overrides() {
        temp_env::with_vars(
            [
                ("DORM_CONSOLE_API_URL", None::<&str>),
                ("DORM_CONSOLE_TOKEN_FILE", None),
                ("DORM_CONSOLE_REQUEST_TIMEOUT_MS", None),
                ("DORM_CONSOLE_IDENTITY_TIMEOUT_MS", None),
            ],
            || {
                let config = AppConfig::load();
                assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
                assert_eq!(config.request_timeout, Duration::from_secs(15));
                assert_eq!(config.identity_timeout, Duration::from_secs(8));
                assert!(config.token_path.ends_with(TOKEN_FILE_NAME));
            },
        );
    }

    #[test]
    fn load_applies_overrides() {
        temp_env::with_vars(
            [
                ("DORM_CONSOLE_API_URL", Some("https://dorm.example.com")),
                ("DORM_CONSOLE_TOKEN_FILE", Some("/tmp/dorm-token")),
                ("DORM_CONSOLE_REQUEST_TIMEOUT_MS", Some("2500")),
                ("DORM_CONSOLE_IDENTITY_TIMEOUT_MS", Some("400")),
            ],
            || {
                let config = AppConfig::load();
                assert_eq!(config.api_base_url, "https://dorm.example.com");
                assert_eq!(config.token_path, PathBuf::from("/tmp/dorm-token"));
                assert_eq!(config.request_timeout, Duration::from_millis(2500));
                assert_eq!(config.identity_timeout, Duration::from_millis(400));
            },
        );
    }

    #[test]
    fn load_ignores_blank_and_invalid_overrides() {
        temp_env::with_vars(
            [
                ("DORM_CONSOLE_API_URL", Some("   ")),
                ("DORM_CONSOLE_TOKEN_FILE", None),
                ("DORM_CONSOLE_REQUEST_TIMEOUT_MS", Some("soon")),
                ("DORM_CONSOLE_IDENTITY_TIMEOUT_MS", None),
            ],
            || {
                let config = AppConfig::load();
                assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
                assert_eq!(config.request_timeout, Duration::from_secs(15));
            },
        );
    }
}
