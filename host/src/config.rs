//! Host settings read from the environment.

use std::env;

use thiserror::Error;

pub const API_URL_VAR: &str = "CASEDOCS_API_URL";
pub const BIND_HOST_VAR: &str = "CASEDOCS_BIND_HOST";
pub const PORT_VAR: &str = "CASEDOCS_PORT";
pub const OPEN_BROWSER_VAR: &str = "CASEDOCS_OPEN_BROWSER";

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_BIND_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a port number, got '{value}'")]
    InvalidPort { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    pub api_url: String,
    pub bind_host: String,
    pub port: u16,
    pub open_browser: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            bind_host: DEFAULT_BIND_HOST.to_string(),
            port: DEFAULT_PORT,
            open_browser: false,
        }
    }
}

impl HostConfig {
    /// Loads `.env` when present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("loaded {}", path.display());
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let port = match value(PORT_VAR) {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort {
                var: PORT_VAR,
                value: raw,
            })?,
            None => defaults.port,
        };

        Ok(Self {
            api_url: value(API_URL_VAR)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
            bind_host: value(BIND_HOST_VAR).unwrap_or(defaults.bind_host),
            port,
            open_browser: value(OPEN_BROWSER_VAR)
                .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true")),
        })
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.bind_host, self.port)
    }
}
