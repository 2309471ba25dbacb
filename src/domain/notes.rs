//! Release notes loading

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Release notes shared by both store submissions.
///
/// Loaded once per run so the App Store version and the Play release carry
/// identical text.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseNotes {
    text: String,
}

impl ReleaseNotes {
    /// Load notes from a file, trimming surrounding whitespace.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read release notes from {}", path.display()))?;
        Ok(Self {
            text: raw.trim().to_string(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
