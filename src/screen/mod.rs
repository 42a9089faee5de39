//! The feed-list screen controller.
//!
//! [`ScreenController`] is the only mutable holder of the list screen's view
//! state: active tag, filter, projection and cursor. Every trigger rebuilds
//! the projection from a fresh snapshot and then repositions the cursor, so
//! callers never observe a half-updated projection.
//!
//! Failures never escape as panics. Each fallible operation reports its error
//! to the [`NotificationSink`] and also returns it, so callers that only care
//! about the screen state can ignore the result.

mod command;
mod notify;

pub use command::{parse as parse_command, tokenize as tokenize_command, Command};
pub use notify::{Notice, NoticeLevel, NotificationSink, RecordingSink, StatusSink};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

use crate::cursor::{Cursor, SavedPosition};
use crate::feed::{MasterFeedSource, RefreshRequest};
use crate::filter::{ExprParser, FilterParseError, FilterState, PredicateParser};
use crate::format::{FormatString, TemplateEngine};
use crate::navigator::{self, Hit, NavError};
use crate::projection::{Projection, VisibleEntry};
use crate::row::{self, DEFAULT_ROW_FORMAT, DEFAULT_TITLE_FORMAT};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScreenError {
    #[error("No feed selected!")]
    EmptyProjection,

    #[error("Position not visible!")]
    NotVisible { number: usize },

    #[error("Invalid position!")]
    OutOfRange { number: usize },

    #[error("Error: couldn't parse filter command: {0}")]
    FilterParse(#[from] FilterParseError),

    #[error("No tags defined.")]
    NoTags,

    #[error("No filters defined.")]
    NoFilters,

    #[error("No filter named `{0}'")]
    UnknownFilter(String),

    #[error("Not a command: {0}")]
    UnknownCommand(String),
}

impl ScreenError {
    /// Benign conditions shown as information rather than errors.
    pub fn is_informational(&self) -> bool {
        matches!(self, ScreenError::EmptyProjection)
    }
}

impl From<NavError> for ScreenError {
    fn from(err: NavError) -> Self {
        match err {
            NavError::EmptyProjection => ScreenError::EmptyProjection,
            NavError::NotVisible { number } => ScreenError::NotVisible { number },
            NavError::OutOfRange { number } => ScreenError::OutOfRange { number },
        }
    }
}

const NO_UNREAD_FEEDS: &str = "No feeds with unread items.";

// ============================================================================
// Settings
// ============================================================================

/// A filter expression saved under a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedFilter {
    pub name: String,
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenSettings {
    /// Whether feeds without unread items are shown when no filter is set.
    pub show_read_feeds: bool,
    pub row_format: String,
    pub title_format: String,
    /// "Reload all" only asks for the feeds currently shown.
    pub reload_only_visible_feeds: bool,
    pub filters: Vec<NamedFilter>,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            show_read_feeds: true,
            row_format: DEFAULT_ROW_FORMAT.to_string(),
            title_format: DEFAULT_TITLE_FORMAT.to_string(),
            reload_only_visible_feeds: false,
            filters: Vec::new(),
        }
    }
}

/// Which feeds a reload should cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshScope {
    Selected,
    All,
}

/// One navigator search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    NextUnread,
    PreviousUnread,
    Title(String),
    Number(usize),
}

// ============================================================================
// Screen Controller
// ============================================================================

pub struct ScreenController {
    source: Arc<dyn MasterFeedSource>,
    parser: Arc<dyn PredicateParser>,
    engine: Arc<dyn TemplateEngine>,
    sink: Arc<dyn NotificationSink>,
    settings: ScreenSettings,
    tag: String,
    filter: FilterState,
    projection: Projection,
    cursor: Cursor,
    width: usize,
}

impl std::fmt::Debug for ScreenController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenController")
            .field("tag", &self.tag)
            .field("filter", &self.filter)
            .field("shown", &self.projection.len())
            .field("cursor", &self.cursor)
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}

impl ScreenController {
    /// Controller using the built-in filter language and format strings.
    pub fn new(
        source: Arc<dyn MasterFeedSource>,
        settings: ScreenSettings,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let filter = FilterState::for_show_read(settings.show_read_feeds);
        let mut controller = Self {
            source,
            parser: Arc::new(ExprParser),
            engine: Arc::new(FormatString),
            sink,
            settings,
            tag: String::new(),
            filter,
            projection: Projection::default(),
            cursor: Cursor::default(),
            width: 0,
        };
        controller.rebuild();
        controller.cursor.zero(&controller.projection);
        controller
    }

    pub fn with_parser(mut self, parser: Arc<dyn PredicateParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_engine(mut self, engine: Arc<dyn TemplateEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor.index()
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn settings(&self) -> &ScreenSettings {
        &self.settings
    }

    pub fn width(&self) -> usize {
        self.width
    }

    fn rebuild(&mut self) {
        self.projection = Projection::build(self.source.snapshot(), &self.tag, &self.filter);
    }

    /// Rebuild with the cursor kept on the same feed where possible.
    fn rebuild_keeping_place(&mut self) {
        let saved = self.cursor.save(&self.projection);
        self.rebuild();
        self.cursor.restore(&self.projection, saved);
    }

    fn surface(&self, err: ScreenError) -> ScreenError {
        let notice = if err.is_informational() {
            Notice::info(err.to_string())
        } else {
            Notice::error(err.to_string())
        };
        self.sink.notify(notice);
        err
    }

    // ------------------------------------------------------------------------
    // Triggers
    // ------------------------------------------------------------------------

    /// The master list changed. The cursor keeps its index, clamped to the new
    /// length.
    pub fn data_refreshed(&mut self) {
        self.rebuild();
        self.cursor.clamp_after_resize(self.projection.len());
        tracing::info!(shown = self.projection.len(), "Feed list refreshed");
    }

    /// Flip between hiding and showing feeds with nothing unread.
    pub fn toggle_show_read(&mut self) {
        self.filter = FilterState::new(!self.filter.enabled);
        self.rebuild_keeping_place();
        tracing::info!(filtered = self.filter.enabled, "Toggled read feed visibility");
    }

    /// Parse `text` and filter by it. On a parse error the previous filter
    /// stays in force. Blank text does nothing.
    pub fn apply_filter(&mut self, text: &str) -> Result<(), ScreenError> {
        if text.trim().is_empty() {
            return Ok(());
        }
        match self.parser.parse(text) {
            Ok(predicate) => {
                self.filter = FilterState::with_predicate(predicate);
                self.rebuild_keeping_place();
                tracing::info!(filter = text, shown = self.projection.len(), "Filter applied");
                Ok(())
            }
            Err(e) => {
                tracing::debug!(filter = text, error = %e, "Filter rejected");
                self.rebuild_keeping_place();
                Err(self.surface(ScreenError::FilterParse(e)))
            }
        }
    }

    /// Apply the configured filter called `name`. A blank name does nothing.
    pub fn select_filter(&mut self, name: &str) -> Result<(), ScreenError> {
        if self.settings.filters.is_empty() {
            return Err(self.surface(ScreenError::NoFilters));
        }
        if name.trim().is_empty() {
            return Ok(());
        }
        let Some(expression) = self
            .settings
            .filters
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.expression.clone())
        else {
            return Err(self.surface(ScreenError::UnknownFilter(name.to_string())));
        };
        self.apply_filter(&expression)
    }

    /// Back to the configured default filter.
    pub fn clear_filter(&mut self) {
        self.filter = FilterState::for_show_read(self.settings.show_read_feeds);
        self.rebuild_keeping_place();
        tracing::info!(filtered = self.filter.enabled, "Filter cleared");
    }

    /// Show only feeds tagged `tag`. An empty argument does nothing.
    pub fn set_tag(&mut self, tag: &str) -> Result<(), ScreenError> {
        if tag.is_empty() {
            return Ok(());
        }
        if self.available_tags().is_empty() {
            return Err(self.surface(ScreenError::NoTags));
        }
        self.tag = tag.to_string();
        self.rebuild();
        self.cursor.zero(&self.projection);
        tracing::info!(tag, shown = self.projection.len(), "Tag set");
        Ok(())
    }

    pub fn clear_tag(&mut self) {
        self.tag.clear();
        self.rebuild();
        self.cursor.zero(&self.projection);
        tracing::info!("Tag cleared");
    }

    /// Sorted distinct tags across the whole master list.
    pub fn available_tags(&self) -> Vec<String> {
        let snapshot = self.source.snapshot();
        let tags: BTreeSet<&str> = snapshot
            .iter()
            .flat_map(|f| f.tags.iter().map(String::as_str))
            .collect();
        tags.into_iter().map(str::to_string).collect()
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// Run one navigator search and move the cursor on a hit. Returns the new
    /// cursor index.
    pub fn navigate(&mut self, navigation: Navigation) -> Option<usize> {
        match navigation {
            Navigation::NextUnread => self.next_unread().map(|h| h.index),
            Navigation::PreviousUnread => self.previous_unread().map(|h| h.index),
            Navigation::Title(needle) => self.goto_title(&needle).map(|h| h.index),
            Navigation::Number(number) => self.goto_number(number).ok(),
        }
    }

    fn unread_search(&mut self, search: fn(&Projection, usize) -> Option<Hit>) -> Option<Hit> {
        let start = self.cursor.index().unwrap_or(0);
        match search(&self.projection, start) {
            Some(hit) => {
                self.cursor.set(&self.projection, hit.index);
                tracing::debug!(
                    cursor = hit.index,
                    real_position = hit.real_position,
                    "Moved to unread feed"
                );
                Some(hit)
            }
            None => {
                self.sink.notify(Notice::info(NO_UNREAD_FEEDS));
                None
            }
        }
    }

    pub fn next_unread(&mut self) -> Option<Hit> {
        self.unread_search(navigator::next_unread)
    }

    pub fn previous_unread(&mut self) -> Option<Hit> {
        self.unread_search(navigator::previous_unread)
    }

    /// Jump to the next feed whose title contains `needle`. A miss leaves the
    /// cursor alone and reports nothing.
    pub fn goto_title(&mut self, needle: &str) -> Option<Hit> {
        let start = self.cursor.index().unwrap_or(0);
        let hit = navigator::goto_by_substring(&self.projection, start, needle);
        match hit {
            Some(hit) => {
                self.cursor.set(&self.projection, hit.index);
            }
            None => tracing::debug!(needle, "No feed title matched"),
        }
        hit
    }

    /// Jump to absolute feed number `number` (`real_position + 1`).
    pub fn goto_number(&mut self, number: usize) -> Result<usize, ScreenError> {
        match navigator::goto_by_displayed_number(&self.projection, number) {
            Ok(index) => {
                self.cursor.set(&self.projection, index);
                Ok(index)
            }
            Err(e) => Err(self.surface(e.into())),
        }
    }

    pub fn move_up(&mut self) -> bool {
        self.cursor.move_up()
    }

    pub fn move_down(&mut self) -> bool {
        self.cursor.move_down(&self.projection)
    }

    /// The entry under the cursor.
    pub fn selected(&self) -> Result<VisibleEntry<'_>, ScreenError> {
        self.cursor
            .index()
            .and_then(|i| self.projection.get(i))
            .ok_or(ScreenError::EmptyProjection)
    }

    /// Move the cursor onto `real_position` if that feed is shown.
    pub fn mark_pos_if_visible(&mut self, real_position: usize) -> bool {
        match self.projection.index_of(real_position) {
            Some(index) => {
                self.cursor.set(&self.projection, index);
                true
            }
            None => false,
        }
    }

    pub fn save_cursor(&self) -> SavedPosition {
        self.cursor.save(&self.projection)
    }

    pub fn restore_cursor(&mut self, saved: SavedPosition) {
        self.cursor.restore(&self.projection, saved);
    }

    // ------------------------------------------------------------------------
    // Command line
    // ------------------------------------------------------------------------

    /// Run a `:` command: a feed number, `tag <name>` or `goto <text>`.
    pub fn handle_command(&mut self, text: &str) -> Result<(), ScreenError> {
        match command::parse(text) {
            Ok(None) => Ok(()),
            Ok(Some(Command::Jump(number))) => self.goto_number(number).map(|_| ()),
            Ok(Some(Command::Tag(tag))) => self.set_tag(&tag),
            Ok(Some(Command::Goto(needle))) => {
                self.goto_title(&needle);
                Ok(())
            }
            Err(unknown) => Err(self.surface(ScreenError::UnknownCommand(unknown))),
        }
    }

    // ------------------------------------------------------------------------
    // Refresh requests
    // ------------------------------------------------------------------------

    /// What to ask the refresher for.
    pub fn refresh_targets(&self, scope: RefreshScope) -> Result<RefreshRequest, ScreenError> {
        match scope {
            RefreshScope::Selected => match self.selected() {
                Ok(entry) => Ok(RefreshRequest::positions(vec![entry.real_position])),
                Err(e) => Err(self.surface(e)),
            },
            RefreshScope::All if self.settings.reload_only_visible_feeds => Ok(
                RefreshRequest::positions(self.projection.real_positions().to_vec()),
            ),
            RefreshScope::All => Ok(RefreshRequest::all()),
        }
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// Record the list width. Returns whether it changed.
    pub fn resize(&mut self, width: usize) -> bool {
        if self.width == width {
            return false;
        }
        self.width = width;
        true
    }

    /// Row for projection index `index`.
    pub fn render_row(&self, index: usize, width: usize) -> Option<String> {
        let entry = self.projection.get(index)?;
        Some(row::render_row(
            self.engine.as_ref(),
            &self.settings.row_format,
            entry,
            index + 1,
            width,
        ))
    }

    /// Every visible row, in order.
    pub fn rows(&self, width: usize) -> Vec<String> {
        self.projection
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                row::render_row(self.engine.as_ref(), &self.settings.row_format, entry, i + 1, width)
            })
            .collect()
    }

    pub fn title_line(&self, width: usize) -> String {
        row::render_title(
            self.engine.as_ref(),
            &self.settings.title_format,
            &self.projection,
            &self.tag,
            width,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{Feed, SharedFeeds};
    use pretty_assertions::assert_eq;

    fn controller(feeds: Vec<Feed>, settings: ScreenSettings) -> (ScreenController, SharedFeeds, Arc<RecordingSink>) {
        let shared = SharedFeeds::new(feeds);
        let sink = Arc::new(RecordingSink::new());
        let screen = ScreenController::new(Arc::new(shared.clone()), settings, sink.clone());
        (screen, shared, sink)
    }

    fn titled(titles: &[(&str, u32)]) -> Vec<Feed> {
        titles
            .iter()
            .map(|&(t, u)| Feed::new(t).with_counts(u, u + 1))
            .collect()
    }

    #[test]
    fn test_initial_state_follows_show_read_setting() {
        let feeds = titled(&[("a", 0), ("b", 1)]);
        let (screen, _, _) = controller(feeds.clone(), ScreenSettings::default());
        assert_eq!(screen.projection().len(), 2);
        assert_eq!(screen.cursor(), Some(0));

        let settings = ScreenSettings {
            show_read_feeds: false,
            ..ScreenSettings::default()
        };
        let (screen, _, _) = controller(feeds, settings);
        assert_eq!(screen.projection().real_positions(), &[1]);
    }

    #[test]
    fn test_toggle_show_read_keeps_feed_under_cursor() {
        let (mut screen, _, _) =
            controller(titled(&[("a", 0), ("b", 1), ("c", 0), ("d", 3)]), ScreenSettings::default());
        screen.goto_number(4).unwrap();
        assert_eq!(screen.cursor(), Some(3));

        screen.toggle_show_read();
        assert!(screen.filter().enabled);
        assert_eq!(screen.projection().real_positions(), &[1, 3]);
        assert_eq!(screen.cursor(), Some(1));

        screen.toggle_show_read();
        assert_eq!(screen.cursor(), Some(3));
    }

    #[test]
    fn test_failed_filter_keeps_previous_projection() {
        let (mut screen, _, sink) =
            controller(titled(&[("a", 0), ("b", 2), ("c", 0)]), ScreenSettings::default());
        screen.apply_filter("unread_count > 0").unwrap();
        let before = screen.projection().real_positions().to_vec();

        let err = screen.apply_filter("unread_count >").unwrap_err();
        assert!(matches!(err, ScreenError::FilterParse(_)));
        assert_eq!(screen.projection().real_positions(), before.as_slice());
        let notice = sink.last().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.text.starts_with("Error: couldn't parse filter command: "));
    }

    #[test]
    fn test_clear_filter_restores_default() {
        let settings = ScreenSettings {
            show_read_feeds: false,
            ..ScreenSettings::default()
        };
        let (mut screen, _, _) = controller(titled(&[("a", 0), ("b", 2)]), settings);
        screen.apply_filter(r#"title = "a""#).unwrap();
        assert_eq!(screen.projection().real_positions(), &[0]);

        screen.clear_filter();
        assert!(screen.filter().enabled);
        assert_eq!(screen.projection().real_positions(), &[1]);
    }

    #[test]
    fn test_select_named_filter() {
        let settings = ScreenSettings {
            filters: vec![NamedFilter {
                name: "busy".to_string(),
                expression: "unread_count >= 2".to_string(),
            }],
            ..ScreenSettings::default()
        };
        let (mut screen, _, sink) = controller(titled(&[("a", 1), ("b", 2), ("c", 5)]), settings);
        screen.select_filter("busy").unwrap();
        assert_eq!(screen.projection().real_positions(), &[1, 2]);

        assert_eq!(
            screen.select_filter("idle"),
            Err(ScreenError::UnknownFilter("idle".to_string()))
        );
        assert_eq!(sink.last().unwrap().text, "No filter named `idle'");
    }

    #[test]
    fn test_blank_filter_input_is_ignored() {
        let settings = ScreenSettings {
            filters: vec![NamedFilter {
                name: "busy".to_string(),
                expression: "unread_count >= 2".to_string(),
            }],
            ..ScreenSettings::default()
        };
        let (mut screen, _, sink) = controller(titled(&[("a", 1), ("b", 2)]), settings);
        screen.apply_filter("unread_count >= 2").unwrap();

        assert_eq!(screen.apply_filter(""), Ok(()));
        assert_eq!(screen.apply_filter("   "), Ok(()));
        assert_eq!(screen.select_filter(""), Ok(()));
        assert_eq!(screen.projection().real_positions(), &[1]);
        assert!(screen.filter().enabled);
        assert!(sink.notices().is_empty());
    }

    #[test]
    fn test_select_filter_without_filters() {
        let (mut screen, _, _) = controller(titled(&[("a", 1)]), ScreenSettings::default());
        assert_eq!(screen.select_filter("any"), Err(ScreenError::NoFilters));
    }

    #[test]
    fn test_set_tag_resets_cursor() {
        let feeds: Vec<Feed> = (0..10)
            .map(|i| {
                let tags = if i % 2 == 0 { vec!["even"] } else { vec!["odd"] };
                Feed::new(format!("f{}", i)).with_tags(tags)
            })
            .collect();
        let (mut screen, _, _) = controller(feeds, ScreenSettings::default());
        screen.goto_number(6).unwrap();
        assert_eq!(screen.cursor(), Some(5));

        screen.set_tag("odd").unwrap();
        assert_eq!(screen.tag(), "odd");
        assert_eq!(screen.cursor(), Some(0));
        assert_eq!(screen.projection().len(), 5);

        screen.clear_tag();
        assert_eq!(screen.projection().len(), 10);
        assert_eq!(screen.cursor(), Some(0));
    }

    #[test]
    fn test_set_tag_without_tags() {
        let (mut screen, _, sink) = controller(titled(&[("a", 1)]), ScreenSettings::default());
        assert_eq!(screen.set_tag("news"), Err(ScreenError::NoTags));
        assert_eq!(sink.last().unwrap().text, "No tags defined.");
        assert_eq!(screen.set_tag(""), Ok(()));
    }

    #[test]
    fn test_available_tags_sorted_distinct() {
        let feeds = vec![
            Feed::new("a").with_tags(["tech", "news"]),
            Feed::new("b").with_tags(["news"]),
            Feed::new("c"),
        ];
        let (screen, _, _) = controller(feeds, ScreenSettings::default());
        assert_eq!(screen.available_tags(), vec!["news", "tech"]);
    }

    #[test]
    fn test_data_refresh_clamps_cursor() {
        let (mut screen, shared, _) =
            controller(titled(&[("a", 1), ("b", 1), ("c", 1), ("d", 1)]), ScreenSettings::default());
        screen.goto_number(4).unwrap();

        shared.replace(titled(&[("a", 1), ("b", 1)]));
        screen.data_refreshed();
        assert_eq!(screen.cursor(), Some(1));

        shared.replace(Vec::new());
        screen.data_refreshed();
        assert_eq!(screen.cursor(), None);
        assert_eq!(screen.selected(), Err(ScreenError::EmptyProjection));
    }

    #[test]
    fn test_unread_miss_reports_info() {
        let (mut screen, _, sink) = controller(titled(&[("a", 0), ("b", 0)]), ScreenSettings::default());
        assert_eq!(screen.next_unread(), None);
        assert_eq!(screen.cursor(), Some(0));
        assert_eq!(sink.last(), Some(Notice::info("No feeds with unread items.")));
    }

    #[test]
    fn test_navigate_dispatch() {
        let (mut screen, _, _) = controller(
            titled(&[("Alpha", 0), ("Beta", 2), ("Gamma", 0), ("Delta", 1)]),
            ScreenSettings::default(),
        );
        assert_eq!(screen.navigate(Navigation::NextUnread), Some(1));
        assert_eq!(screen.navigate(Navigation::NextUnread), Some(3));
        assert_eq!(screen.navigate(Navigation::PreviousUnread), Some(1));
        assert_eq!(screen.navigate(Navigation::Title("gam".to_string())), Some(2));
        assert_eq!(screen.navigate(Navigation::Title("zzz".to_string())), None);
        assert_eq!(screen.cursor(), Some(2));
        assert_eq!(screen.navigate(Navigation::Number(1)), Some(0));
    }

    #[test]
    fn test_goto_number_errors_are_surfaced() {
        let (mut screen, _, sink) = controller(titled(&[("a", 1), ("b", 0), ("c", 1)]), ScreenSettings::default());
        screen.apply_filter("unread_count > 0").unwrap();

        assert_eq!(screen.goto_number(2), Err(ScreenError::NotVisible { number: 2 }));
        assert_eq!(sink.last(), Some(Notice::error("Position not visible!")));
        assert_eq!(screen.goto_number(9), Err(ScreenError::OutOfRange { number: 9 }));
        assert_eq!(sink.last(), Some(Notice::error("Invalid position!")));
    }

    #[test]
    fn test_handle_command() {
        let feeds = vec![
            Feed::new("Rust Blog").with_tags(["rust"]),
            Feed::new("LWN").with_tags(["linux"]),
            Feed::new("Rust Weekly").with_tags(["rust"]),
        ];
        let (mut screen, _, sink) = controller(feeds, ScreenSettings::default());

        screen.handle_command("3").unwrap();
        assert_eq!(screen.cursor(), Some(2));

        screen.handle_command(r#"goto "lwn""#).unwrap();
        assert_eq!(screen.cursor(), Some(1));

        screen.handle_command("tag rust").unwrap();
        assert_eq!(screen.tag(), "rust");
        assert_eq!(screen.projection().len(), 2);

        assert_eq!(
            screen.handle_command("explode"),
            Err(ScreenError::UnknownCommand("explode".to_string()))
        );
        assert_eq!(sink.last().unwrap().text, "Not a command: explode");
        assert_eq!(screen.handle_command("   "), Ok(()));
    }

    #[test]
    fn test_handle_command_number_prefix_and_first_goto_argument() {
        let (mut screen, _, _) = controller(titled(&[("a", 0), ("b", 0), ("c", 0)]), ScreenSettings::default());

        screen.handle_command("3abc").unwrap();
        assert_eq!(screen.cursor(), Some(2));

        screen.handle_command("1").unwrap();
        screen.handle_command(r#"goto "b" extra"#).unwrap();
        assert_eq!(screen.cursor(), Some(1));
    }

    #[test]
    fn test_handle_command_unterminated_quote() {
        let (mut screen, _, sink) = controller(titled(&[("a", 0)]), ScreenSettings::default());
        let text = r#"goto "a"#;
        assert_eq!(
            screen.handle_command(text),
            Err(ScreenError::UnknownCommand(text.to_string()))
        );
        assert_eq!(sink.last().unwrap().level, NoticeLevel::Error);
    }

    #[test]
    fn test_mark_pos_if_visible() {
        let (mut screen, _, _) = controller(titled(&[("a", 1), ("b", 0), ("c", 1)]), ScreenSettings::default());
        assert!(screen.mark_pos_if_visible(2));
        assert_eq!(screen.cursor(), Some(2));

        screen.toggle_show_read();
        assert!(!screen.mark_pos_if_visible(1));
        assert_eq!(screen.cursor(), Some(1));
    }

    #[test]
    fn test_refresh_targets() {
        let settings = ScreenSettings {
            show_read_feeds: false,
            reload_only_visible_feeds: true,
            ..ScreenSettings::default()
        };
        let (screen, _, _) = controller(titled(&[("a", 1), ("b", 0), ("c", 1)]), settings);
        assert_eq!(
            screen.refresh_targets(RefreshScope::All),
            Ok(RefreshRequest::positions(vec![0, 2]))
        );
        assert_eq!(
            screen.refresh_targets(RefreshScope::Selected),
            Ok(RefreshRequest::positions(vec![0]))
        );

        let (screen, _, _) = controller(titled(&[("a", 1)]), ScreenSettings::default());
        assert_eq!(screen.refresh_targets(RefreshScope::All), Ok(RefreshRequest::all()));
    }

    #[test]
    fn test_refresh_selected_on_empty_list() {
        let (screen, _, sink) = controller(Vec::new(), ScreenSettings::default());
        assert_eq!(
            screen.refresh_targets(RefreshScope::Selected),
            Err(ScreenError::EmptyProjection)
        );
        assert_eq!(sink.last(), Some(Notice::info("No feed selected!")));
    }

    #[test]
    fn test_resize_reports_change() {
        let (mut screen, _, _) = controller(Vec::new(), ScreenSettings::default());
        assert!(screen.resize(80));
        assert!(!screen.resize(80));
        assert_eq!(screen.width(), 80);
    }

    #[test]
    fn test_rows_and_title_line() {
        let settings = ScreenSettings {
            row_format: "%i|%I|%n|%t".to_string(),
            title_format: "%u/%t%?T? [%T]&?".to_string(),
            show_read_feeds: false,
            ..ScreenSettings::default()
        };
        let (screen, _, _) = controller(titled(&[("a", 0), ("b", 4), ("", 1)]), settings);
        assert_eq!(screen.rows(80), vec!["1|2|N|b", "2|3|N|<no title>"]);
        assert_eq!(screen.render_row(1, 80).as_deref(), Some("2|3|N|<no title>"));
        assert_eq!(screen.render_row(2, 80), None);
        assert_eq!(screen.title_line(80), "2/2");
    }

    #[test]
    fn test_save_restore_cursor() {
        let (mut screen, _, _) = controller(titled(&[("a", 1), ("b", 1), ("c", 1)]), ScreenSettings::default());
        screen.move_down();
        let saved = screen.save_cursor();
        screen.move_down();
        screen.restore_cursor(saved);
        assert_eq!(screen.cursor(), Some(1));
    }
}
