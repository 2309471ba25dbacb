//! Domain layer - pure business logic
//!
//! This module contains business logic with no external I/O.
//! Types and functions here can be unit tested without mocking.

pub mod app_store;
pub mod notes;
pub mod promotion;

// Re-export commonly used types
pub use app_store::{select_latest, AppVersion, Build, Submission};
pub use notes::ReleaseNotes;
pub use promotion::{PromotionPhase, PromotionPlan, PromotionStep, StepResult};
