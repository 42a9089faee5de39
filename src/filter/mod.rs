//! Filter predicates over feeds.
//!
//! The list screen treats a filter as an opaque capability: something that can
//! say yes or no about one feed. Where the predicate comes from (the built-in
//! expression language in [`expr`], a closure in tests, anything else) is the
//! caller's business.

pub mod expr;

use crate::feed::Feed;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub use expr::{ExprParser, FilterExpr};

// ============================================================================
// Error Types
// ============================================================================

/// User-supplied filter text could not be turned into a predicate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position {position}")]
pub struct FilterParseError {
    /// Byte offset into the filter text.
    pub position: usize,
    pub message: String,
}

impl FilterParseError {
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// A predicate failed on a particular feed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("unknown attribute `{0}`")]
    UnknownAttribute(String),

    #[error("attribute `{attribute}` has non-numeric value `{value}`")]
    NotNumeric { attribute: String, value: String },
}

// ============================================================================
// Predicate Port
// ============================================================================

/// Boolean test over one feed. Must be pure.
pub trait Predicate: fmt::Debug + Send + Sync {
    fn evaluate(&self, feed: &Feed) -> Result<bool, EvalError>;

    /// Human-readable form, used in logs.
    fn describe(&self) -> Cow<'_, str>;
}

/// Turns user-entered filter text into a predicate.
pub trait PredicateParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<Arc<dyn Predicate>, FilterParseError>;
}

/// The default filter: the feed has at least one unread item.
#[derive(Debug, Clone, Copy, Default)]
pub struct HasUnread;

impl Predicate for HasUnread {
    fn evaluate(&self, feed: &Feed) -> Result<bool, EvalError> {
        Ok(feed.unread_count != 0)
    }

    fn describe(&self) -> Cow<'_, str> {
        Cow::Borrowed("unread_count != \"0\"")
    }
}

// ============================================================================
// Filter State
// ============================================================================

/// Whether filtering is on, and with which predicate.
#[derive(Debug, Clone)]
pub struct FilterState {
    pub enabled: bool,
    pub predicate: Arc<dyn Predicate>,
}

impl FilterState {
    /// Default predicate, with filtering switched on or off.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            predicate: Arc::new(HasUnread),
        }
    }

    /// Initial state for the `show_read_feeds` setting: hiding read feeds
    /// means the unread filter starts enabled.
    pub fn for_show_read(show_read_feeds: bool) -> Self {
        Self::new(!show_read_feeds)
    }

    pub fn with_predicate(predicate: Arc<dyn Predicate>) -> Self {
        Self {
            enabled: true,
            predicate,
        }
    }

    /// Whether `feed` passes. A disabled filter passes everything.
    pub fn admits(&self, feed: &Feed) -> Result<bool, EvalError> {
        if !self.enabled {
            return Ok(true);
        }
        self.predicate.evaluate(feed)
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(true)
    }
}
