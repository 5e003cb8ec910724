//! HTTP client configuration.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::error::{HttpError, Result};

/// Environment variable names read by [`HttpConfig::from_env`].
pub mod vars {
    pub const TIMEOUT_SECS: &str = "COURIER_HTTP_TIMEOUT_SECS";
    pub const CONNECT_TIMEOUT_SECS: &str = "COURIER_HTTP_CONNECT_TIMEOUT_SECS";
    pub const USER_AGENT: &str = "COURIER_HTTP_USER_AGENT";
    pub const DISABLE_KEEP_ALIVE: &str = "COURIER_HTTP_DISABLE_KEEP_ALIVE";
    pub const GZIP: &str = "COURIER_HTTP_GZIP";
}

/// HTTP client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Total request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
    /// Maximum idle connections per host.
    pub pool_max_idle_per_host: usize,
    /// Enable gzip decompression.
    pub gzip: bool,
    /// Close the connection after every request.
    pub disable_keep_alive: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("courier-http/{}", env!("CARGO_PKG_VERSION")),
            pool_max_idle_per_host: 10,
            gzip: true,
            disable_keep_alive: false,
        }
    }
}

impl HttpConfig {
    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(secs) = parse_var::<u64>(vars::TIMEOUT_SECS)? {
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(secs) = parse_var::<u64>(vars::CONNECT_TIMEOUT_SECS)? {
            config.connect_timeout = Duration::from_secs(secs);
        }

        if let Ok(user_agent) = env::var(vars::USER_AGENT) {
            config.user_agent = user_agent;
        }

        if let Some(flag) = flag_var(vars::DISABLE_KEEP_ALIVE) {
            config.disable_keep_alive = flag;
        }

        if let Some(flag) = flag_var(vars::GZIP) {
            config.gzip = flag;
        }

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(var: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| HttpError::Config {
                var: var.to_string(),
                message: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

fn flag_var(var: &str) -> Option<bool> {
    env::var(var)
        .ok()
        .map(|v| v.to_lowercase() == "true" || v == "1")
}
