//! Text helpers shared by the format engine and the terminal shell.
//!
//! Everything here measures in terminal columns (`unicode-width`), not bytes
//! or chars.

mod text;

pub use text::{display_width, pad_to_width, strip_control_chars, truncate_to_width, Align};
