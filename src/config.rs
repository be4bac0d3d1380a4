//! Application configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const PREFS_DIR: &str = "flashdeck";
const PREFS_FILE: &str = "prefs.json";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required env var {var}")]
    Missing { var: &'static str },
    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
    #[error("no user config directory; set FLASHDECK_PREFS_PATH")]
    NoConfigDir,
}

impl crate::notice::ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "E_CONFIG_MISSING",
            Self::Invalid { .. } => "E_CONFIG_INVALID",
            Self::NoConfigDir => "E_CONFIG_DIR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Backend base URL without a trailing slash.
    pub backend_url: String,
    /// Public anon key sent as `apikey` on every request.
    pub anon_key: String,
    pub timeouts: HttpTimeouts,
    pub prefs_path: PathBuf,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `FLASHDECK_BACKEND_URL`
    /// - `FLASHDECK_ANON_KEY`
    ///
    /// Optional:
    /// - `FLASHDECK_REQUEST_TIMEOUT_SECS`: default 30
    /// - `FLASHDECK_CONNECT_TIMEOUT_SECS`: default 10
    /// - `FLASHDECK_PREFS_PATH`: default `<config dir>/flashdeck/prefs.json`
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for missing or unparsable values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an explicit variable source.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for missing or unparsable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend_url = required(&lookup, "FLASHDECK_BACKEND_URL")?;
        if !(backend_url.starts_with("http://") || backend_url.starts_with("https://")) {
            return Err(ConfigError::Invalid { var: "FLASHDECK_BACKEND_URL", value: backend_url });
        }
        let backend_url = backend_url.trim_end_matches('/').to_string();
        let anon_key = required(&lookup, "FLASHDECK_ANON_KEY")?;

        let timeouts = HttpTimeouts {
            request_secs: parse_u64(&lookup, "FLASHDECK_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_u64(&lookup, "FLASHDECK_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        let prefs_path = match lookup("FLASHDECK_PREFS_PATH").filter(|v| !v.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => dirs::config_dir().ok_or(ConfigError::NoConfigDir)?.join(PREFS_DIR).join(PREFS_FILE),
        };

        Ok(Self { backend_url, anon_key, timeouts, prefs_path })
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, var: &'static str) -> Result<String, ConfigError> {
    lookup(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing { var })
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, var: &'static str, default: u64) -> Result<u64, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(v) if v > 0 => Ok(v),
            _ => Err(ConfigError::Invalid { var, value: raw }),
        },
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
