//! Client configuration parsed from environment variables.

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_SESSION_FILE: &str = ".platefeed-session.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// API origin, without a trailing slash.
    pub base_url: String,
    /// Path of the durable session file.
    pub session_file: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl ApiConfig {
    /// Build typed config from environment variables.
    ///
    /// All optional:
    /// - `PLATEFEED_BASE_URL`: default `http://127.0.0.1:3000`
    /// - `PLATEFEED_SESSION_FILE`: default `.platefeed-session.json`
    /// - `PLATEFEED_REQUEST_TIMEOUT_SECS`: default 30
    /// - `PLATEFEED_CONNECT_TIMEOUT_SECS`: default 10
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var("PLATEFEED_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let session_file =
            std::env::var("PLATEFEED_SESSION_FILE").unwrap_or_else(|_| DEFAULT_SESSION_FILE.to_string());

        Self {
            base_url,
            session_file,
            request_timeout_secs: env_parse_u64("PLATEFEED_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout_secs: env_parse_u64("PLATEFEED_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_file: DEFAULT_SESSION_FILE.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
