//! The master feed list and how it reaches the list screen.
//!
//! - [`types`] - the `Feed` record
//! - [`source`] - snapshot port, shared snapshot slot, JSON snapshot file
//! - [`refresher`] - background task that keeps the shared snapshot current
//!
//! Everything downstream (projection, navigation, rendering) works on an
//! `Arc<Vec<Feed>>` obtained from [`MasterFeedSource::snapshot`], never on a
//! list that can change mid-read.

mod refresher;
mod source;
mod types;

pub use refresher::{spawn_refresher, RefreshRequest};
pub use source::{parse_snapshot, FileFeedSource, MasterFeedSource, SharedFeeds, SourceError};
pub use types::Feed;
