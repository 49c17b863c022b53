//! Preference loading for the command line.
//!
//! Preferences live in a TOML file whose keys mirror `FeedPreferences`:
//!
//! ```toml
//! backlog_ratio = 0.25
//! max_consecutive_from_source = 2
//! max_duration_secs = 3600
//! allowed_source_types = ["YOUTUBE", "PODCAST"]
//!
//! [[muted_keywords]]
//! keyword = "spoilers"
//! ```
//!
//! Missing keys fall back to defaults. The result is always validated.

use anyhow::{Context, Result};
use feed_model::FeedPreferences;
use std::path::Path;
use tracing::debug;

/// Load preferences from `path`, or use defaults when no file is given.
pub fn load_preferences(path: Option<&Path>) -> Result<FeedPreferences> {
    let preferences = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read preferences from {}", path.display()))?;
            parse_preferences(&content)
                .with_context(|| format!("Invalid preferences file {}", path.display()))?
        }
        None => {
            debug!("No preferences file given, using defaults");
            FeedPreferences::default()
        }
    };

    preferences.validate()?;
    Ok(preferences)
}

fn parse_preferences(content: &str) -> Result<FeedPreferences> {
    Ok(toml::from_str(content)?)
}
