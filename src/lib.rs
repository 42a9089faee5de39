//! Visible-feed projection and navigation for a terminal feed reader's
//! feed-list screen.
//!
//! The master feed list arrives as immutable snapshots ([`feed`]). Each
//! snapshot is reduced to the feeds the user should see ([`projection`])
//! under the current tag and filter ([`filter`]). A cursor ([`cursor`])
//! and the circular searches in [`navigator`] move over that projection,
//! while [`row`] and [`format`] turn it into text. [`screen`] owns all of
//! this state and is what the terminal shell in [`ui`] drives.

pub mod app;
pub mod config;
pub mod cursor;
pub mod feed;
pub mod filter;
pub mod format;
pub mod keybindings;
pub mod navigator;
pub mod projection;
pub mod row;
pub mod screen;
pub mod ui;
pub mod util;
