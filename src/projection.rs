//! The visible subsequence of the master feed list.
//!
//! A [`Projection`] keeps the snapshot it was built from alongside the real
//! positions it admitted, so entries are re-dereferenced through the snapshot
//! rather than held as references into a list that a refresh may replace.

use std::sync::Arc;

use crate::feed::Feed;
use crate::filter::FilterState;

/// One visible row: a feed and its index in the master snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleEntry<'a> {
    pub feed: &'a Feed,
    pub real_position: usize,
}

/// Ordered visible entries, valid for the snapshot they were built from.
#[derive(Debug, Clone, Default)]
pub struct Projection {
    snapshot: Arc<Vec<Feed>>,
    positions: Vec<usize>,
}

impl Projection {
    /// Derive the visible entries from `snapshot`.
    ///
    /// A feed is shown when it carries `tag` (or `tag` is empty) and the filter
    /// admits it. A predicate that fails to evaluate excludes the feed; the
    /// failures are logged once per build.
    pub fn build(snapshot: Arc<Vec<Feed>>, tag: &str, filter: &FilterState) -> Self {
        let mut positions = Vec::with_capacity(snapshot.len());
        let mut failures = 0usize;
        let mut first_failure = None;

        for (real_position, feed) in snapshot.iter().enumerate() {
            if !tag.is_empty() && !feed.matches_tag(tag) {
                continue;
            }
            match filter.admits(feed) {
                Ok(true) => positions.push(real_position),
                Ok(false) => {}
                Err(e) => {
                    failures += 1;
                    first_failure.get_or_insert((real_position, e));
                }
            }
        }

        if let Some((real_position, error)) = first_failure {
            tracing::warn!(
                failures,
                real_position,
                error = %error,
                filter = %filter.predicate.describe(),
                "Filter evaluation failed, affected feeds hidden"
            );
        }

        tracing::debug!(
            shown = positions.len(),
            total = snapshot.len(),
            tag,
            filtered = filter.enabled,
            "Built feed projection"
        );

        Self {
            snapshot,
            positions,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of feeds shown. Same as [`len`](Self::len).
    pub fn shown_count(&self) -> usize {
        self.positions.len()
    }

    /// Shown feeds that have unread items.
    pub fn unread_count(&self) -> usize {
        self.iter().filter(|e| e.feed.has_unread()).count()
    }

    pub fn get(&self, index: usize) -> Option<VisibleEntry<'_>> {
        let real_position = *self.positions.get(index)?;
        let feed = self.snapshot.get(real_position)?;
        Some(VisibleEntry {
            feed,
            real_position,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = VisibleEntry<'_>> + '_ {
        self.positions.iter().filter_map(|&real_position| {
            self.snapshot.get(real_position).map(|feed| VisibleEntry {
                feed,
                real_position,
            })
        })
    }

    /// Real positions in display order.
    pub fn real_positions(&self) -> &[usize] {
        &self.positions
    }

    /// Index of the entry for `real_position`, if shown.
    pub fn index_of(&self, real_position: usize) -> Option<usize> {
        self.positions.binary_search(&real_position).ok()
    }

    /// Highest real position shown.
    pub fn max_real_position(&self) -> Option<usize> {
        self.positions.last().copied()
    }

    /// The master snapshot this projection was built from.
    pub fn snapshot(&self) -> &Arc<Vec<Feed>> {
        &self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{EvalError, Predicate};
    use std::borrow::Cow;

    fn feeds(unread: &[u32]) -> Arc<Vec<Feed>> {
        Arc::new(
            unread
                .iter()
                .enumerate()
                .map(|(i, &u)| Feed::new(format!("feed {}", i)).with_counts(u, u + 1))
                .collect(),
        )
    }

    #[derive(Debug)]
    struct FailsOnOdd;

    impl Predicate for FailsOnOdd {
        fn evaluate(&self, feed: &Feed) -> Result<bool, EvalError> {
            if feed.unread_count % 2 == 1 {
                Err(EvalError::UnknownAttribute("odd".to_string()))
            } else {
                Ok(true)
            }
        }

        fn describe(&self) -> Cow<'_, str> {
            Cow::Borrowed("fails on odd")
        }
    }

    #[test]
    fn test_default_filter_keeps_unread_only() {
        let projection = Projection::build(feeds(&[0, 2, 0]), "", &FilterState::new(true));
        assert_eq!(projection.real_positions(), &[1]);
        assert_eq!(projection.get(0).unwrap().feed.title, "feed 1");
    }

    #[test]
    fn test_disabled_filter_shows_everything() {
        let projection = Projection::build(feeds(&[0, 2, 0]), "", &FilterState::new(false));
        assert_eq!(projection.real_positions(), &[0, 1, 2]);
        assert_eq!(projection.unread_count(), 1);
    }

    #[test]
    fn test_tag_and_filter_combine() {
        let snapshot = Arc::new(vec![
            Feed::new("a").with_tags(["tech"]).with_counts(1, 1),
            Feed::new("b").with_tags(["news"]).with_counts(1, 1),
            Feed::new("c").with_tags(["news", "tech"]).with_counts(0, 1),
            Feed::new("d").with_tags(["tech"]).with_counts(5, 9),
        ]);
        let projection = Projection::build(snapshot.clone(), "tech", &FilterState::new(true));
        assert_eq!(projection.real_positions(), &[0, 3]);

        let projection = Projection::build(snapshot, "tech", &FilterState::new(false));
        assert_eq!(projection.real_positions(), &[0, 2, 3]);
    }

    #[test]
    fn test_empty_master_list() {
        let projection = Projection::build(Arc::new(Vec::new()), "", &FilterState::new(false));
        assert!(projection.is_empty());
        assert!(projection.get(0).is_none());
        assert_eq!(projection.max_real_position(), None);
    }

    #[test]
    fn test_eval_failure_excludes_feed() {
        let filter = FilterState::with_predicate(Arc::new(FailsOnOdd));
        let projection = Projection::build(feeds(&[0, 1, 2, 3]), "", &filter);
        assert_eq!(projection.real_positions(), &[0, 2]);
    }

    #[test]
    fn test_index_of() {
        let projection = Projection::build(feeds(&[1, 0, 1, 1]), "", &FilterState::new(true));
        assert_eq!(projection.index_of(2), Some(1));
        assert_eq!(projection.index_of(1), None);
        assert_eq!(projection.max_real_position(), Some(3));
    }
}
