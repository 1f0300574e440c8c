//! Application configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000/api";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

/// Auth backend endpoint and public key. Both must be present for the auth
/// client to be functional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthBackendConfig {
    pub url: String,
    pub anon_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `None` when either auth variable is missing; the auth client then
    /// fails every call instead of crashing.
    pub auth: Option<AuthBackendConfig>,
    pub api_base_url: String,
    pub session_file: PathBuf,
    pub http_timeout_secs: u64,
    pub port: u16,
    pub website_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Build typed config from the process environment.
    ///
    /// Optional:
    /// - `HEALITHM_SUPABASE_URL` / `HEALITHM_SUPABASE_ANON_KEY`: auth backend
    /// - `HEALITHM_API_URL`: REST base, default [`DEFAULT_API_URL`]
    /// - `HEALITHM_SESSION_FILE`: default `$HOME/.healithm/session.json`
    /// - `HEALITHM_HTTP_TIMEOUT_SECS`: default 30
    /// - `PORT`: default 3000
    /// - `WEBSITE_DIR`: static site root served by `serve`
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let auth = match (non_empty("HEALITHM_SUPABASE_URL"), non_empty("HEALITHM_SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) => {
                Some(AuthBackendConfig { url: url.trim_end_matches('/').to_owned(), anon_key })
            }
            _ => None,
        };

        let api_base_url = non_empty("HEALITHM_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();

        let session_file = non_empty("HEALITHM_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_session_file(non_empty("HOME")));

        let http_timeout_secs = parse_or("HEALITHM_HTTP_TIMEOUT_SECS", non_empty("HEALITHM_HTTP_TIMEOUT_SECS"), DEFAULT_HTTP_TIMEOUT_SECS)?;
        let port = parse_or("PORT", non_empty("PORT"), DEFAULT_PORT)?;
        let website_dir = non_empty("WEBSITE_DIR").map(PathBuf::from);

        Ok(Self { auth, api_base_url, session_file, http_timeout_secs, port, website_dir })
    }
}

fn parse_or<T: std::str::FromStr>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
    }
}

fn default_session_file(home: Option<String>) -> PathBuf {
    home.map_or_else(|| PathBuf::from(".healithm"), |h| PathBuf::from(h).join(".healithm"))
        .join(SESSION_FILE_NAME)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
