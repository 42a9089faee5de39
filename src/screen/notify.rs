//! Where the list screen sends its informational and error messages.

use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A user-visible message from the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Where status and error messages go. The list screen does not interpret
/// what happens to them afterwards.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}

/// Keeps the latest notice for the status bar to pick up.
#[derive(Debug, Clone, Default)]
pub struct StatusSink {
    latest: Arc<Mutex<Option<Notice>>>,
}

impl StatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the pending notice, leaving none.
    pub fn take(&self) -> Option<Notice> {
        self.latest
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
    }
}

impl NotificationSink for StatusSink {
    fn notify(&self, notice: Notice) {
        *self.latest.lock().unwrap_or_else(|e| e.into_inner()) = Some(notice);
    }
}

/// Collects every notice in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notice);
    }
}
