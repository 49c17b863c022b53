//! Loader for feed snapshots stored on disk.
//!
//! A snapshot directory holds one consistent point-in-time view of a user's
//! data, as JSON arrays:
//! - sources.json: subscribed sources
//! - content.json: every candidate content item
//! - interactions.json: the interaction log (optional, empty if missing)

use crate::error::{FeedError, Result};
use crate::index::InteractionIndex;
use crate::types::{ContentInteraction, ContentItem, ContentSource};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const SOURCES_FILE: &str = "sources.json";
pub const CONTENT_FILE: &str = "content.json";
pub const INTERACTIONS_FILE: &str = "interactions.json";

/// Everything the feed generator needs, loaded at once
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub sources: Vec<ContentSource>,
    pub content: Vec<ContentItem>,
    pub interactions: Vec<ContentInteraction>,
}

/// Read and deserialize a JSON array file
fn parse_json_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => FeedError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => FeedError::Io(e),
    })?;

    serde_json::from_str(&content).map_err(|e| FeedError::ParseError {
        file: file_name,
        reason: e.to_string(),
    })
}

pub fn parse_sources(path: &Path) -> Result<Vec<ContentSource>> {
    parse_json_file(path)
}

pub fn parse_content(path: &Path) -> Result<Vec<ContentItem>> {
    parse_json_file(path)
}

/// Parse the interaction log. A missing file is an empty log.
pub fn parse_interactions(path: &Path) -> Result<Vec<ContentInteraction>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    parse_json_file(path)
}

impl Snapshot {
    /// Load a snapshot directory, parsing the three files in parallel.
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        tracing::debug!("Loading snapshot from {:?}", data_dir);

        let sources_path = data_dir.join(SOURCES_FILE);
        let content_path = data_dir.join(CONTENT_FILE);
        let interactions_path = data_dir.join(INTERACTIONS_FILE);

        let ((sources, content), interactions) = rayon::join(
            || {
                rayon::join(
                    || parse_sources(&sources_path),
                    || parse_content(&content_path),
                )
            },
            || parse_interactions(&interactions_path),
        );

        let snapshot = Snapshot {
            sources: sources?,
            content: content?,
            interactions: interactions?,
        };
        snapshot.validate()?;

        tracing::info!(
            "Loaded {} sources, {} content items, {} interactions",
            snapshot.sources.len(),
            snapshot.content.len(),
            snapshot.interactions.len()
        );

        Ok(snapshot)
    }

    /// Check catalog integrity.
    ///
    /// Duplicate content ids are fatal. Interactions on unknown content are
    /// kept: the log is append-only and may outlive pruned items.
    pub fn validate(&self) -> Result<()> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(self.content.len());
        for item in &self.content {
            if !seen.insert(item.id.as_str()) {
                return Err(FeedError::DuplicateContent {
                    id: item.id.clone(),
                });
            }
        }

        let dangling = self
            .interactions
            .iter()
            .filter(|i| !seen.contains(i.content_id.as_str()))
            .count();
        if dangling > 0 {
            tracing::warn!("{} interactions refer to unknown content", dangling);
        }

        Ok(())
    }

    pub fn interaction_index(&self) -> InteractionIndex {
        InteractionIndex::from_interactions(&self.interactions)
    }

    /// Get counts for debugging/validation
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.sources.len(), self.content.len(), self.interactions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SOURCES: &str = r#"[
        {"source_id": "UC1", "source_type": "YOUTUBE", "display_name": "Channel One"},
        {"source_id": "feed", "source_type": "RSS", "display_name": "Blog", "is_muted": true}
    ]"#;

    const CONTENT: &str = r#"[
        {
            "id": "c1",
            "original_id": "v1",
            "title": "First video",
            "url": "https://example.com/v1",
            "duration": 300,
            "published_at": "2024-05-01T10:00:00Z",
            "source_id": "UC1",
            "source_type": "YOUTUBE"
        },
        {
            "id": "c2",
            "original_id": "post-2",
            "title": "A post",
            "description": "Long read",
            "url": "https://example.com/post-2",
            "published_at": "2024-03-01T10:00:00Z",
            "source_id": "feed",
            "source_type": "RSS"
        }
    ]"#;

    fn write_file(dir: &Path, name: &str, body: &str) {
        let mut file = fs::File::create(dir.join(name)).unwrap();
        file.write_all(body.as_bytes()).unwrap();
    }

    #[test]
    fn test_load_snapshot_without_interactions() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), SOURCES_FILE, SOURCES);
        write_file(dir.path(), CONTENT_FILE, CONTENT);

        let snapshot = Snapshot::load_from_dir(dir.path()).unwrap();
        assert_eq!(snapshot.counts(), (2, 2, 0));
        assert!(snapshot.sources[1].is_muted);
        assert!(!snapshot.sources[0].is_muted);
        assert_eq!(snapshot.content[0].duration, Some(300));
        assert_eq!(snapshot.content[1].duration, None);
    }

    #[test]
    fn test_load_snapshot_with_interactions() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), SOURCES_FILE, SOURCES);
        write_file(dir.path(), CONTENT_FILE, CONTENT);
        write_file(
            dir.path(),
            INTERACTIONS_FILE,
            r#"[{"content_id": "c1", "interaction_type": "NOT_NOW", "timestamp": "2024-05-02T08:00:00Z"}]"#,
        );

        let snapshot = Snapshot::load_from_dir(dir.path()).unwrap();
        let index = snapshot.interaction_index();
        assert!(index.is_deferred("c1"));
    }

    #[test]
    fn test_missing_content_file() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), SOURCES_FILE, SOURCES);

        let err = Snapshot::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, FeedError::FileNotFound { .. }));
    }

    #[test]
    fn test_malformed_file_reports_name() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), SOURCES_FILE, "[{\"source_id\": 1}]");
        write_file(dir.path(), CONTENT_FILE, CONTENT);

        match Snapshot::load_from_dir(dir.path()) {
            Err(FeedError::ParseError { file, .. }) => assert_eq!(file, SOURCES_FILE),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_content_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), SOURCES_FILE, SOURCES);
        let doubled = CONTENT.replace("\"id\": \"c2\"", "\"id\": \"c1\"");
        write_file(dir.path(), CONTENT_FILE, &doubled);

        let err = Snapshot::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, FeedError::DuplicateContent { ref id } if id == "c1"));
    }
}
