use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod config;
mod domain;
mod error;
mod infrastructure;
mod services;
mod ui;

use cli::{Cli, Commands};
use commands::{builds, promote};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with LOGGING env var support
    // LOGGING=debug,info,warn,error or just LOGGING=debug
    let log_level = std::env::var("LOGGING")
        .or_else(|_| std::env::var("LOG_LEVEL"))
        .unwrap_or_else(|_| {
            if cli.verbose {
                "debug".to_string()
            } else {
                "info".to_string()
            }
        });

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(false) // Disable ANSI escape codes for cleaner output
        .init();

    let outcome = match cli.command {
        Commands::Promote {
            app_store_key_id,
            app_store_issuer_id,
            app_store_private_key,
            app_store_app_id,
            google_play_json_key,
            google_play_package_name,
            whats_new_file,
            skip_app_store,
            skip_play,
            timeout,
            connect_timeout,
        } => {
            promote::execute(
                app_store_key_id,
                app_store_issuer_id,
                app_store_private_key,
                app_store_app_id,
                google_play_json_key,
                google_play_package_name,
                whats_new_file,
                skip_app_store,
                skip_play,
                timeout,
                connect_timeout,
            )
            .await
        }
        Commands::Builds {
            app_store_key_id,
            app_store_issuer_id,
            app_store_private_key,
            app_store_app_id,
            limit,
            timeout,
            connect_timeout,
        } => {
            builds::execute(
                app_store_key_id,
                app_store_issuer_id,
                app_store_private_key,
                app_store_app_id,
                limit,
                timeout,
                connect_timeout,
            )
            .await
        }
    };

    if let Err(e) = outcome {
        ui::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
