//! HTTP client behavior

use std::time::Duration;

use crate::error::ConfigError;

/// Timeouts applied to every outbound request on both halves.
#[derive(Debug, Clone, Copy)]
pub struct HttpConfig {
    /// Total per-request timeout
    pub timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl HttpConfig {
    /// Parse from humantime strings as passed on the CLI ("30s", "1m").
    pub fn from_options(timeout: &str, connect_timeout: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            timeout: parse_duration(timeout, "timeout")?,
            connect_timeout: parse_duration(connect_timeout, "connect timeout")?,
        })
    }
}

fn parse_duration(value: &str, field: &'static str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value).map_err(|e| ConfigError::InvalidValue {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
