//! CLI definitions for liftoff
//!
//! This module contains all CLI argument parsing structures using clap.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "liftoff",
    version,
    about = "Release promotion for mobile app stores",
    long_about = "Promotes a mobile release across both stores in one run:\nsubmits the latest App Store build for review, then promotes the\ncurrent Play internal release to the production track."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Submit the latest App Store build and promote the Play internal release
    Promote {
        /// App Store Connect API key id
        #[arg(long, env = "APP_STORE_KEY_ID")]
        app_store_key_id: Option<String>,

        /// App Store Connect issuer id
        #[arg(long, env = "APP_STORE_ISSUER_ID")]
        app_store_issuer_id: Option<String>,

        /// App Store Connect private key (PEM text, not a file path)
        #[arg(long, env = "APP_STORE_PRIVATE_KEY")]
        app_store_private_key: Option<String>,

        /// App Store Connect app id
        #[arg(long, env = "APP_STORE_APP_ID")]
        app_store_app_id: Option<String>,

        /// Play service-account key (JSON text, not a file path)
        #[arg(long, env = "GOOGLE_PLAY_JSON_KEY")]
        google_play_json_key: Option<String>,

        /// Play package name
        #[arg(long, env = "GOOGLE_PLAY_PACKAGE_NAME")]
        google_play_package_name: Option<String>,

        /// Release notes file (whitespace-trimmed plain text)
        #[arg(long, env = "WHATS_NEW_FILE", default_value = "whats_new.txt")]
        whats_new_file: String,

        /// Skip the App Store half entirely
        #[arg(long)]
        skip_app_store: bool,

        /// Skip the Play half entirely
        #[arg(long)]
        skip_play: bool,

        /// Per-request timeout
        #[arg(long, default_value = "30s")]
        timeout: String,

        /// Connection timeout
        #[arg(long, default_value = "10s")]
        connect_timeout: String,
    },

    /// List uploaded App Store builds and mark the promotion candidate
    Builds {
        /// App Store Connect API key id
        #[arg(long, env = "APP_STORE_KEY_ID")]
        app_store_key_id: Option<String>,

        /// App Store Connect issuer id
        #[arg(long, env = "APP_STORE_ISSUER_ID")]
        app_store_issuer_id: Option<String>,

        /// App Store Connect private key (PEM text, not a file path)
        #[arg(long, env = "APP_STORE_PRIVATE_KEY")]
        app_store_private_key: Option<String>,

        /// App Store Connect app id
        #[arg(long, env = "APP_STORE_APP_ID")]
        app_store_app_id: Option<String>,

        /// Maximum builds to print
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Per-request timeout
        #[arg(long, default_value = "30s")]
        timeout: String,

        /// Connection timeout
        #[arg(long, default_value = "10s")]
        connect_timeout: String,
    },
}
