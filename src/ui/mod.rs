//! Terminal user interface for the feed list.
//!
//! - `loop_runner` - main event loop and terminal management
//! - `input` - key handling for the list and the prompt
//! - `events` - refresher event processing
//! - `render` - layout
//! - `feeds` - feed list widget
//! - `status` - status bar and prompt line

mod events;
mod feeds;
mod input;
mod loop_runner;
mod render;
mod status;

pub use loop_runner::{run, Action};
