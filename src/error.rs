//! Centralized error types for liftoff
//!
//! Uses thiserror for typed errors that can be matched on,
//! while still being compatible with anyhow for propagation.

use thiserror::Error;

/// Errors raised by the platform clients.
///
/// Every vendor call maps onto one of these kinds; nothing is retried or
/// recovered locally. The orchestrator logs the failing step once and the
/// process exits non-zero.
#[derive(Error, Debug)]
pub enum PromoteError {
    /// Key material could not be parsed or used for signing
    /// (App Store Connect `.p8` key, Google service-account JSON).
    #[error("Invalid credential material: {reason}")]
    Credential { reason: String },

    /// A collection the pipeline depends on is empty
    /// (no builds uploaded, no internal releases to promote from).
    #[error("Not found: {what}")]
    NotFound { what: String },

    /// The vendor rejected a write as conflicting, HTTP 409
    /// (typically a duplicate version string on re-run).
    #[error("Conflict from {endpoint}: {message}")]
    Conflict { endpoint: String, message: String },

    /// Any other non-2xx vendor response.
    #[error("HTTP {status} from {endpoint}: {body}")]
    Http {
        status: u16,
        endpoint: String,
        body: String,
    },

    /// Network-level failure: connect, timeout, TLS, or a response body
    /// that could not be read or decoded.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Required configuration missing: {field}. Set {env_var} or pass --{flag}")]
    MissingField {
        field: &'static str,
        env_var: &'static str,
        flag: &'static str,
    },

    #[error("Invalid configuration value for {field}: {value} ({reason})")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: String,
    },
}
