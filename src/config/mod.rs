//! # Store Configuration
//!
//! Credentials and HTTP behavior for both store halves, built once at
//! process entry from CLI flags (each backed by an environment variable)
//! and passed into the client constructors. No ambient global state.
//!
//! Key material is passed by VALUE, not by path: `APP_STORE_PRIVATE_KEY`
//! holds the PEM text itself and `GOOGLE_PLAY_JSON_KEY` holds the
//! service-account JSON document. This keeps CI secret wiring to plain
//! environment injection with no temp files.

mod app_store;
mod http;
mod play;

pub use app_store::AppStoreConfig;
pub use http::HttpConfig;
pub use play::PlayConfig;
