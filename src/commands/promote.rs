//! Promote command - submit the App Store build, promote the Play release
//!
//! Assembles per-store credentials, builds the two clients, and runs the
//! promotion workflow. A half that is skipped needs no credentials at all.
//!
//! Re-running after a partial failure starts over from the beginning: a
//! version created by the failed run is not reused, and the create step
//! will then hit a duplicate-version conflict. There is no replay
//! protection.

use anyhow::Result;
use tracing::debug;

use crate::config::{AppStoreConfig, HttpConfig, PlayConfig};
use crate::domain::PromotionPlan;
use crate::infrastructure::{AppStoreClient, PlayClient};
use crate::services::PromotionService;
use crate::ui;

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    app_store_key_id: Option<String>,
    app_store_issuer_id: Option<String>,
    app_store_private_key: Option<String>,
    app_store_app_id: Option<String>,
    google_play_json_key: Option<String>,
    google_play_package_name: Option<String>,
    whats_new_file: String,
    skip_app_store: bool,
    skip_play: bool,
    timeout: String,
    connect_timeout: String,
) -> Result<()> {
    let http = HttpConfig::from_options(&timeout, &connect_timeout)?;
    debug!("HTTP timeouts: {:?} / {:?}", http.timeout, http.connect_timeout);

    let mut plan = PromotionPlan::new().with_notes_file(whats_new_file);
    if skip_app_store {
        plan = plan.without_app_store();
    }
    if skip_play {
        plan = plan.without_play();
    }

    let store = if skip_app_store {
        None
    } else {
        let config = AppStoreConfig::from_options(
            app_store_key_id,
            app_store_issuer_id,
            app_store_private_key,
            app_store_app_id,
        )?;
        plan = plan.with_app_id(config.app_id.clone());
        Some(AppStoreClient::new(&config, http)?)
    };

    let play = if skip_play {
        None
    } else {
        let config = PlayConfig::from_options(google_play_json_key, google_play_package_name)?;
        plan = plan.with_package_name(config.package_name.clone());
        Some(PlayClient::new(&config, http)?)
    };

    let service = PromotionService::new(store, play);
    service.execute(plan).await?;

    ui::print_success("Promotion complete!");
    println!();

    Ok(())
}
