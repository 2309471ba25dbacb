//! Promotion service - orchestrates the release promotion workflow
//!
//! This service coordinates the steps of a promotion: read notes, fetch
//! the latest App Store build, create and update a version, submit it for
//! review, then promote the Play internal release to production.
//!
//! The first failure stops the run. Nothing is retried and nothing is
//! rolled back; a created-but-unsubmitted version stays behind on the
//! vendor side for the operator to inspect.

use anyhow::{Context, Result};
use colored::Colorize;
use std::time::Instant;
use tracing::{info, warn};

use crate::domain::notes::ReleaseNotes;
use crate::domain::promotion::{PromotionPhase, PromotionPlan, PromotionStep, StepResult};
use crate::domain::{select_latest, Build};
use crate::error::PromoteError;
use crate::infrastructure::app_store::BuildDistributor;
use crate::infrastructure::play::ReleasePromoter;

/// Values threaded from one step to the next within a single run.
#[derive(Default)]
struct RunState {
    notes: Option<ReleaseNotes>,
    build: Option<Build>,
    version_id: Option<String>,
}

/// Service for orchestrating promotions.
///
/// Generic over the two platform clients so tests can drive the workflow
/// with in-memory doubles. A `None` client is only valid when the plan
/// skips that half.
pub struct PromotionService<S, P> {
    store: Option<S>,
    play: Option<P>,
}

impl<S: BuildDistributor, P: ReleasePromoter> PromotionService<S, P> {
    pub fn new(store: Option<S>, play: Option<P>) -> Self {
        Self { store, play }
    }

    /// Execute a full promotion workflow
    pub async fn execute(&self, plan: PromotionPlan) -> Result<Vec<StepResult>> {
        plan.validate().map_err(|errors| {
            anyhow::anyhow!("Invalid promotion plan:\n  {}", errors.join("\n  "))
        })?;

        self.print_header(&plan);

        let mut results = Vec::new();
        let mut current_phase = PromotionPhase::Pending;
        let mut state = RunState::default();

        for step in plan.steps() {
            current_phase = PromotionPhase::InProgress(step);
            info!("{} Starting: {}", step.emoji(), step.name());

            let start = Instant::now();
            let result = self.execute_step(&plan, &mut state, step).await;
            let duration = start.elapsed();

            match result {
                Ok(message) => {
                    info!(
                        "{} {} completed in {:.1}s",
                        "✅".green(),
                        step.name(),
                        duration.as_secs_f64()
                    );
                    results.push(match message {
                        Some(m) => StepResult::success_with(step, duration, m),
                        None => StepResult::success(step, duration),
                    });
                }
                Err(e) => {
                    let msg = format!("{:#}", e);
                    info!("{} {} failed: {}", "❌".red(), step.name(), msg);
                    results.push(StepResult::failure(step, duration, &msg));
                    current_phase = PromotionPhase::Failed(step);

                    // Stop on first failure
                    self.print_summary(&plan, &results, current_phase);
                    return Err(e);
                }
            }
        }

        current_phase = PromotionPhase::Completed;
        self.print_summary(&plan, &results, current_phase);

        Ok(results)
    }

    /// Execute a single promotion step
    async fn execute_step(
        &self,
        plan: &PromotionPlan,
        state: &mut RunState,
        step: PromotionStep,
    ) -> Result<Option<String>> {
        match step {
            PromotionStep::ReadNotes => self.step_read_notes(plan, state),
            PromotionStep::FetchLatestBuild => self.step_fetch_latest_build(state).await,
            PromotionStep::CreateVersion => self.step_create_version(state).await,
            PromotionStep::UpdateVersion => self.step_update_version(state).await,
            PromotionStep::SubmitReview => self.step_submit_review(state).await,
            PromotionStep::PromotePlay => self.step_promote_play(state).await,
        }
    }

    fn store(&self) -> Result<&S> {
        self.store.as_ref().context("App Store client not configured")
    }

    fn play(&self) -> Result<&P> {
        self.play.as_ref().context("Play client not configured")
    }

    fn step_read_notes(
        &self,
        plan: &PromotionPlan,
        state: &mut RunState,
    ) -> Result<Option<String>> {
        let notes = ReleaseNotes::load(&plan.notes_file)?;
        if notes.is_empty() {
            warn!("Release notes file {} is empty", plan.notes_file);
        }
        info!("Loaded release notes from {}", plan.notes_file);

        let message = format!("{} characters", notes.text().len());
        state.notes = Some(notes);
        Ok(Some(message))
    }

    async fn step_fetch_latest_build(&self, state: &mut RunState) -> Result<Option<String>> {
        let builds = self.store()?.list_builds().await?;
        let latest = select_latest(&builds)
            .ok_or_else(|| PromoteError::NotFound {
                what: "builds for the app".to_string(),
            })?
            .clone();

        info!("Latest build: {} (version {})", latest.id, latest.version);
        if let Some(build_number) = &latest.build_number {
            info!("Build number: {}", build_number);
        }

        let message = format!("build {} version {}", latest.id, latest.version);
        state.build = Some(latest);
        Ok(Some(message))
    }

    async fn step_create_version(&self, state: &mut RunState) -> Result<Option<String>> {
        let build = state.build.as_ref().context("no build selected")?;

        let version = self
            .store()?
            .create_version(&build.id, &build.version)
            .await?;
        info!("Created version {} for build {}", version.id, build.id);

        let message = format!("version {}", version.id);
        state.version_id = Some(version.id);
        Ok(Some(message))
    }

    async fn step_update_version(&self, state: &mut RunState) -> Result<Option<String>> {
        let notes = state.notes.as_ref().context("release notes not loaded")?;
        let version_id = state.version_id.as_deref().context("no version created")?;

        self.store()?.update_version(version_id, notes.text()).await?;
        info!("Attached release notes to version {}", version_id);

        Ok(None)
    }

    async fn step_submit_review(&self, state: &mut RunState) -> Result<Option<String>> {
        let version_id = state.version_id.as_deref().context("no version created")?;

        let submission = self.store()?.submit_for_review(version_id).await?;
        info!(
            "Submitted version {} for review (submission {})",
            version_id, submission.id
        );

        Ok(Some(format!("submission {}", submission.id)))
    }

    async fn step_promote_play(&self, state: &mut RunState) -> Result<Option<String>> {
        let notes = state.notes.as_ref().context("release notes not loaded")?;

        let version_code = self
            .play()?
            .promote_internal_to_production(notes.text())
            .await?;
        info!("Promoted version code {} to production", version_code);

        Ok(Some(format!("version code {}", version_code)))
    }

    fn target(plan: &PromotionPlan) -> String {
        match (plan.skip_app_store, plan.skip_play) {
            (false, false) => format!("{} + {}", plan.app_id, plan.package_name),
            (false, true) => plan.app_id.clone(),
            (true, false) => plan.package_name.clone(),
            (true, true) => "nothing".to_string(),
        }
    }

    fn print_header(&self, plan: &PromotionPlan) {
        println!();
        println!(
            "{}",
            "╔════════════════════════════════════════════════════════════╗".bright_blue()
        );
        println!(
            "{}",
            format!("║  Promotion: {:<46} ║", Self::target(plan)).bright_blue()
        );
        println!(
            "{}",
            "╚════════════════════════════════════════════════════════════╝".bright_blue()
        );
        println!();
        if !plan.skip_app_store {
            info!("App Store app: {}", plan.app_id);
        } else {
            info!("⏭️ App Store half skipped");
        }
        if !plan.skip_play {
            info!("Play package: {}", plan.package_name);
        } else {
            info!("⏭️ Play half skipped");
        }
        info!("Notes file: {}", plan.notes_file);
        info!("Steps: {}", plan.steps().len());
        println!();
    }

    fn print_summary(
        &self,
        plan: &PromotionPlan,
        results: &[StepResult],
        phase: PromotionPhase,
    ) {
        println!();
        println!(
            "{}",
            "════════════════════════════════════════════════════════════".bright_blue()
        );

        match phase {
            PromotionPhase::Completed => {
                println!(
                    "{}",
                    format!("✅ Promotion completed: {}", Self::target(plan))
                        .bright_green()
                        .bold()
                );
            }
            PromotionPhase::Failed(step) => {
                println!(
                    "{}",
                    format!(
                        "❌ Promotion failed at {}: {}",
                        step.name(),
                        Self::target(plan)
                    )
                    .bright_red()
                    .bold()
                );
            }
            _ => {}
        }

        println!();
        for result in results {
            let status = if result.success { "✅" } else { "❌" };
            match &result.message {
                Some(message) => println!(
                    "   {} {} ({:.1}s) - {}",
                    status,
                    result.step.name(),
                    result.duration.as_secs_f64(),
                    message
                ),
                None => println!(
                    "   {} {} ({:.1}s)",
                    status,
                    result.step.name(),
                    result.duration.as_secs_f64()
                ),
            }
        }
        println!();
    }
}
