//! The feed record shared by every layer of the list screen.

use serde::{Deserialize, Serialize};

/// One subscribed feed as seen by the list screen.
///
/// Records are owned by whoever maintains the master list (the snapshot
/// source); the list screen only ever reads them through a snapshot. A feed's
/// real position is its index in that snapshot and is not stored here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Feed {
    pub title: String,
    pub link: String,
    pub source_url: String,
    pub description: String,
    /// Ordered tag list; the first entry is what `%T` shows in a row.
    pub tags: Vec<String>,
    pub unread_count: u32,
    pub total_count: u32,
}

impl Feed {
    /// Feed with a title and no items.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_counts(mut self, unread: u32, total: u32) -> Self {
        self.unread_count = unread;
        self.total_count = total;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    pub fn has_unread(&self) -> bool {
        self.unread_count > 0
    }

    pub fn matches_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// First tag, or `""` for an untagged feed.
    pub fn first_tag(&self) -> &str {
        self.tags.first().map(String::as_str).unwrap_or("")
    }

    /// Enforce `unread_count <= total_count`.
    ///
    /// Returns true if the record had to be corrected.
    pub(crate) fn clamp_counts(&mut self) -> bool {
        if self.unread_count > self.total_count {
            self.unread_count = self.total_count;
            return true;
        }
        false
    }
}
