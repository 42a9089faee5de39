use crate::feed::RefreshRequest;
use crate::keybindings::KeybindingRegistry;
use crate::screen::{NoticeLevel, RefreshScope, ScreenController, StatusSink};
use std::borrow::Cow;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// How long a status message stays on screen.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// Background Events
// ============================================================================

/// Messages from background tasks to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    /// The shared master list was replaced.
    FeedsRefreshed { count: usize },
    /// A reload attempt failed; the previous list is still in place.
    RefreshFailed { error: String },
}

// ============================================================================
// Prompt
// ============================================================================

/// What a line of prompt input will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Filter,
    NamedFilter,
    Tag,
    Goto,
    Command,
}

impl PromptKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Filter => "Filter: ",
            Self::NamedFilter => "Filter name: ",
            Self::Tag => "Tag: ",
            Self::Goto => "Search for: ",
            Self::Command => ":",
        }
    }
}

/// One-line text input shown in place of the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
    /// Candidate values shown alongside the prompt (tags, filter names).
    pub choices: Vec<String>,
}

impl Prompt {
    pub fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: String::new(),
            choices: Vec::new(),
        }
    }

    pub fn with_choices(mut self, choices: Vec<String>) -> Self {
        self.choices = choices;
        self
    }
}

// ============================================================================
// App State
// ============================================================================

/// State of the interactive shell around the list screen.
pub struct App {
    pub screen: ScreenController,
    /// Notices reported by the screen, picked up after each action.
    pub notices: StatusSink,
    pub keybindings: KeybindingRegistry,
    pub prompt: Option<Prompt>,
    pub status_message: Option<(Cow<'static, str>, NoticeLevel, Instant)>,
    /// First visible row of the list, kept so the cursor stays on screen.
    pub list_offset: usize,
    /// A reload has been requested and not answered yet.
    pub refreshing: bool,
    pub needs_redraw: bool,
    refresh_tx: mpsc::Sender<RefreshRequest>,
}

impl App {
    pub fn new(
        screen: ScreenController,
        notices: StatusSink,
        keybindings: KeybindingRegistry,
        refresh_tx: mpsc::Sender<RefreshRequest>,
    ) -> Self {
        Self {
            screen,
            notices,
            keybindings,
            prompt: None,
            status_message: None,
            list_offset: 0,
            refreshing: false,
            needs_redraw: true,
            refresh_tx,
        }
    }

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), NoticeLevel::Info, Instant::now()));
    }

    pub fn set_error(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), NoticeLevel::Error, Instant::now()));
    }

    /// Move any pending screen notice into the status bar.
    pub fn collect_notices(&mut self) {
        if let Some(notice) = self.notices.take() {
            match notice.level {
                NoticeLevel::Info => self.set_status(notice.text),
                NoticeLevel::Error => self.set_error(notice.text),
            }
        }
    }

    /// Clear the status message once it is older than three seconds.
    /// Returns true if a message was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, _, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// Ask the background refresher to reload `scope`.
    pub fn request_refresh(&mut self, scope: RefreshScope) {
        let Ok(request) = self.screen.refresh_targets(scope) else {
            self.collect_notices();
            return;
        };

        match self.refresh_tx.try_send(request) {
            Ok(()) => {
                self.refreshing = true;
                self.set_status("Reloading...");
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.set_status("Reload already in progress");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::error!("Refresher task is gone");
                self.set_error("Error: feed reloading is unavailable");
            }
        }
    }

    /// Keep the cursor row inside a viewport of `height` rows.
    pub fn scroll_to_cursor(&mut self, height: usize) {
        let Some(cursor) = self.screen.cursor() else {
            self.list_offset = 0;
            return;
        };
        if height == 0 {
            return;
        }
        if cursor < self.list_offset {
            self.list_offset = cursor;
        } else if cursor >= self.list_offset + height {
            self.list_offset = cursor + 1 - height;
        }
    }
}
