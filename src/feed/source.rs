//! Master feed list snapshots.
//!
//! The list screen never reads a list that can change underneath it: every
//! reader takes an `Arc<Vec<Feed>>` snapshot, and writers swap in a whole new
//! vector. A projection built from one snapshot therefore stays valid until
//! the caller decides to rebuild from the next one.
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use thiserror::Error;

use super::types::Feed;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read feed snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid feed snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Feed snapshot too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Snapshot Port
// ============================================================================

/// Read-only, point-in-time access to the master feed list.
pub trait MasterFeedSource: Send + Sync {
    /// Current master list. The returned vector is never mutated afterwards.
    fn snapshot(&self) -> Arc<Vec<Feed>>;
}

/// Master list shared between the refresh task and the list screen.
///
/// Clones share the same underlying slot.
#[derive(Debug, Clone, Default)]
pub struct SharedFeeds {
    current: Arc<RwLock<Arc<Vec<Feed>>>>,
}

impl SharedFeeds {
    pub fn new(feeds: Vec<Feed>) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(feeds))),
        }
    }

    /// Swap in a new master list. Existing snapshots are unaffected.
    pub fn replace(&self, feeds: Vec<Feed>) {
        let next = Arc::new(feeds);
        let mut slot = self.current.write().unwrap_or_else(|e| e.into_inner());
        *slot = next;
    }
}

impl MasterFeedSource for SharedFeeds {
    fn snapshot(&self) -> Arc<Vec<Feed>> {
        let slot = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*slot)
    }
}

// ============================================================================
// JSON Snapshot File
// ============================================================================

/// Maximum accepted snapshot file size (16 MB).
const MAX_SNAPSHOT_SIZE: u64 = 16 * 1024 * 1024;

/// Parse a JSON array of feeds, correcting impossible unread counts.
pub fn parse_snapshot(content: &str) -> Result<Vec<Feed>, SourceError> {
    let mut feeds: Vec<Feed> = serde_json::from_str(content)?;
    for (position, feed) in feeds.iter_mut().enumerate() {
        if feed.clamp_counts() {
            tracing::warn!(
                position,
                title = %feed.title,
                "unread_count exceeded total_count, clamped"
            );
        }
    }
    Ok(feeds)
}

/// Master list backed by a JSON file that an external process keeps current.
#[derive(Debug, Clone)]
pub struct FileFeedSource {
    path: PathBuf,
    feeds: SharedFeeds,
}

impl FileFeedSource {
    pub fn new(path: impl Into<PathBuf>, feeds: SharedFeeds) -> Self {
        Self {
            path: path.into(),
            feeds,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn shared(&self) -> &SharedFeeds {
        &self.feeds
    }

    /// Re-read the file and swap the shared list. Returns the feed count.
    ///
    /// On error the previous list stays in place.
    pub async fn reload(&self) -> Result<usize, SourceError> {
        let meta = tokio::fs::metadata(&self.path).await?;
        if meta.len() > MAX_SNAPSHOT_SIZE {
            return Err(SourceError::TooLarge(format!(
                "{} is {} bytes (max {} bytes)",
                self.path.display(),
                meta.len(),
                MAX_SNAPSHOT_SIZE
            )));
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        let feeds = if content.trim().is_empty() {
            Vec::new()
        } else {
            parse_snapshot(&content)?
        };
        let count = feeds.len();
        self.feeds.replace(feeds);
        tracing::debug!(path = %self.path.display(), feeds = count, "Reloaded feed snapshot");
        Ok(count)
    }
}

impl MasterFeedSource for FileFeedSource {
    fn snapshot(&self) -> Arc<Vec<Feed>> {
        self.feeds.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_unaffected_by_replace() {
        let shared = SharedFeeds::new(vec![Feed::new("a"), Feed::new("b")]);
        let before = shared.snapshot();

        shared.replace(vec![Feed::new("c")]);

        assert_eq!(before.len(), 2);
        assert_eq!(before[0].title, "a");
        let after = shared.snapshot();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].title, "c");
    }

    #[test]
    fn test_clones_share_slot() {
        let shared = SharedFeeds::default();
        let other = shared.clone();
        other.replace(vec![Feed::new("x")]);
        assert_eq!(shared.snapshot().len(), 1);
    }

    #[test]
    fn test_parse_snapshot_clamps_counts() {
        let feeds =
            parse_snapshot(r#"[{"title":"a","unread_count":5,"total_count":2}]"#).unwrap();
        assert_eq!(feeds[0].unread_count, 2);
        assert_eq!(feeds[0].total_count, 2);
    }

    #[test]
    fn test_parse_snapshot_rejects_non_array() {
        let result = parse_snapshot(r#"{"title":"a"}"#);
        assert!(matches!(result, Err(SourceError::Parse(_))));
    }

    #[tokio::test]
    async fn test_reload_replaces_shared_list() {
        let dir = std::env::temp_dir().join("feedlist_source_test_reload");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("feeds.json");
        std::fs::write(
            &path,
            r#"[{"title":"One","tags":["news"]},{"title":"Two","unread_count":1,"total_count":4}]"#,
        )
        .unwrap();

        let source = FileFeedSource::new(&path, SharedFeeds::default());
        assert_eq!(source.reload().await.unwrap(), 2);

        let snapshot = source.snapshot();
        assert_eq!(snapshot[0].first_tag(), "news");
        assert_eq!(snapshot[1].unread_count, 1);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_reload_failure_keeps_previous_list() {
        let dir = std::env::temp_dir().join("feedlist_source_test_bad");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("feeds.json");
        std::fs::write(&path, "not json").unwrap();

        let shared = SharedFeeds::new(vec![Feed::new("kept")]);
        let source = FileFeedSource::new(&path, shared.clone());
        assert!(source.reload().await.is_err());
        assert_eq!(shared.snapshot()[0].title, "kept");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_reload_missing_file_is_io_error() {
        let source = FileFeedSource::new(
            "/tmp/feedlist_source_test_nonexistent.json",
            SharedFeeds::default(),
        );
        assert!(matches!(source.reload().await, Err(SourceError::Io(_))));
    }

    #[tokio::test]
    async fn test_reload_empty_file_yields_empty_list() {
        let dir = std::env::temp_dir().join("feedlist_source_test_empty");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("feeds.json");
        std::fs::write(&path, "  \n").unwrap();

        let source = FileFeedSource::new(&path, SharedFeeds::new(vec![Feed::new("old")]));
        assert_eq!(source.reload().await.unwrap(), 0);
        assert!(source.snapshot().is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }
}
