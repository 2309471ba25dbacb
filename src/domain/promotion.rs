//! Promotion domain types
//!
//! Defines the store promotion workflow as a state machine with explicit
//! phases.

use std::time::Duration;

/// Individual steps in a promotion workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionStep {
    /// Read release notes from disk
    ReadNotes,
    /// Fetch the latest uploaded App Store build
    FetchLatestBuild,
    /// Create a new App Store version record
    CreateVersion,
    /// Attach release notes and release type to the version
    UpdateVersion,
    /// Submit the version for App Store review
    SubmitReview,
    /// Promote the current internal release to Play production
    PromotePlay,
}

impl PromotionStep {
    /// Get human-readable name for the step
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReadNotes => "Read Notes",
            Self::FetchLatestBuild => "Fetch Latest Build",
            Self::CreateVersion => "Create Version",
            Self::UpdateVersion => "Update Version",
            Self::SubmitReview => "Submit Review",
            Self::PromotePlay => "Promote Play",
        }
    }

    /// Get emoji for the step
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::ReadNotes => "📄",
            Self::FetchLatestBuild => "🔍",
            Self::CreateVersion => "🆕",
            Self::UpdateVersion => "📝",
            Self::SubmitReview => "📤",
            Self::PromotePlay => "🚀",
        }
    }
}

/// Current phase of a promotion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionPhase {
    /// Not started
    Pending,
    /// Currently executing
    InProgress(PromotionStep),
    /// Completed successfully
    Completed,
    /// Failed at a specific step
    Failed(PromotionStep),
}

/// Configuration for a promotion workflow
#[derive(Debug, Clone)]
pub struct PromotionPlan {
    /// App Store Connect app id
    pub app_id: String,
    /// Android application package name
    pub package_name: String,
    /// Path to the release notes file
    pub notes_file: String,
    /// Skip the App Store half entirely
    pub skip_app_store: bool,
    /// Skip the Play half entirely
    pub skip_play: bool,
}

impl PromotionPlan {
    /// Create a new plan with defaults
    pub fn new() -> Self {
        Self {
            app_id: String::new(),
            package_name: String::new(),
            notes_file: "whats_new.txt".to_string(),
            skip_app_store: false,
            skip_play: false,
        }
    }

    /// Builder: set App Store app id
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    /// Builder: set Play package name
    pub fn with_package_name(mut self, package_name: impl Into<String>) -> Self {
        self.package_name = package_name.into();
        self
    }

    /// Builder: set release notes file path
    pub fn with_notes_file(mut self, path: impl Into<String>) -> Self {
        self.notes_file = path.into();
        self
    }

    /// Builder: skip the App Store half
    pub fn without_app_store(mut self) -> Self {
        self.skip_app_store = true;
        self
    }

    /// Builder: skip the Play half
    pub fn without_play(mut self) -> Self {
        self.skip_play = true;
        self
    }

    /// Steps this plan will execute, in order. App Store steps run before
    /// the Play step; a failed App Store half prevents the Play half from
    /// running at all.
    pub fn steps(&self) -> Vec<PromotionStep> {
        let mut steps = vec![PromotionStep::ReadNotes];
        if !self.skip_app_store {
            steps.extend([
                PromotionStep::FetchLatestBuild,
                PromotionStep::CreateVersion,
                PromotionStep::UpdateVersion,
                PromotionStep::SubmitReview,
            ]);
        }
        if !self.skip_play {
            steps.push(PromotionStep::PromotePlay);
        }
        steps
    }

    /// Validate the plan
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.skip_app_store && self.skip_play {
            errors.push("Both store halves are skipped; nothing to do".to_string());
        }
        if !self.skip_app_store && self.app_id.is_empty() {
            errors.push("App Store app id is required".to_string());
        }
        if !self.skip_play && self.package_name.is_empty() {
            errors.push("Play package name is required".to_string());
        }
        if self.notes_file.is_empty() {
            errors.push("Release notes file path is required".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Default for PromotionPlan {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a promotion step execution
#[derive(Debug)]
pub struct StepResult {
    pub step: PromotionStep,
    pub success: bool,
    pub duration: Duration,
    pub message: Option<String>,
}

impl StepResult {
    pub fn success(step: PromotionStep, duration: Duration) -> Self {
        Self {
            step,
            success: true,
            duration,
            message: None,
        }
    }

    pub fn success_with(
        step: PromotionStep,
        duration: Duration,
        message: impl Into<String>,
    ) -> Self {
        Self {
            step,
            success: true,
            duration,
            message: Some(message.into()),
        }
    }

    pub fn failure(step: PromotionStep, duration: Duration, message: impl Into<String>) -> Self {
        Self {
            step,
            success: false,
            duration,
            message: Some(message.into()),
        }
    }
}
