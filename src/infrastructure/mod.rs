//! Infrastructure layer - external I/O adapters
//!
//! This module contains all code that talks to the vendor platforms:
//! - App Store Connect REST API (builds, versions, submissions)
//! - Connect API token signing
//! - Google service-account token exchange
//! - Play Android Publisher API (edit sessions, tracks)

pub mod app_store;
pub mod connect_token;
pub mod google_auth;
pub mod play;

// Re-export commonly used types
pub use app_store::{AppStoreClient, BuildDistributor};
pub use connect_token::ConnectTokenIssuer;
pub use google_auth::ServiceAccountKey;
pub use play::{EditSession, PlayClient, ReleasePromoter};
