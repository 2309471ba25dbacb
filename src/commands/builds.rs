//! Builds command - read-only listing of uploaded App Store builds
//!
//! Shows what the promote command would see, newest first, with the build
//! it would pick marked. Useful before a run to confirm the right binary
//! is at the top.

use anyhow::Result;
use colored::Colorize;

use crate::config::{AppStoreConfig, HttpConfig};
use crate::domain::{select_latest, Build};
use crate::infrastructure::{AppStoreClient, BuildDistributor};
use crate::ui;

pub async fn execute(
    app_store_key_id: Option<String>,
    app_store_issuer_id: Option<String>,
    app_store_private_key: Option<String>,
    app_store_app_id: Option<String>,
    limit: usize,
    timeout: String,
    connect_timeout: String,
) -> Result<()> {
    ui::print_header("App Store Builds");

    let http = HttpConfig::from_options(&timeout, &connect_timeout)?;
    let config = AppStoreConfig::from_options(
        app_store_key_id,
        app_store_issuer_id,
        app_store_private_key,
        app_store_app_id,
    )?;
    let client = AppStoreClient::new(&config, http)?;

    let pb = ui::spinner("Fetching builds...");
    let builds = client.list_builds().await;
    pb.finish_and_clear();
    let builds = builds?;

    ui::print_info(&format!("App: {}", config.app_id));
    ui::print_info(&format!("Builds: {}", builds.len()));
    println!();

    let latest_id = select_latest(&builds).map(|b| b.id.clone());

    let mut sorted: Vec<&Build> = builds.iter().collect();
    sorted.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));

    for build in sorted.iter().take(limit) {
        let marker = if latest_id.as_deref() == Some(build.id.as_str()) {
            "→".bright_green().bold().to_string()
        } else {
            " ".to_string()
        };
        let number = build
            .build_number
            .as_deref()
            .map(|n| format!(" (build {})", n))
            .unwrap_or_default();
        println!(
            "   {} {:<12} version {:<10} uploaded {}{}",
            marker,
            build.id,
            build.version,
            build.uploaded_at.format("%Y-%m-%d %H:%M UTC"),
            number
        );
    }
    if sorted.len() > limit {
        println!("   ... and {} more", sorted.len() - limit);
    }
    println!();

    if let Some(id) = latest_id {
        ui::print_success(&format!("Promotion candidate: {}", id));
    }
    println!();

    Ok(())
}
