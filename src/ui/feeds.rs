use crate::app::App;
use crate::util::strip_control_chars;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{List, ListItem},
    Frame,
};

/// Row `index` as it may be written to the terminal: escape sequences and
/// other control characters in feed text are removed.
fn row_text(app: &App, index: usize, width: usize) -> Option<String> {
    let row = app.screen.render_row(index, width)?;
    Some(strip_control_chars(&row).into_owned())
}

/// Render the visible feed rows, keeping the cursor row on screen.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let height = usize::from(area.height);
    app.scroll_to_cursor(height);
    let app: &App = app;

    let projection = app.screen.projection();
    if projection.is_empty() {
        f.render_widget(List::new([ListItem::new("No feeds to show")]), area);
        return;
    }

    let width = usize::from(area.width);
    let cursor = app.screen.cursor();
    let items: Vec<ListItem> = (app.list_offset..projection.len())
        .take(height)
        .filter_map(|index| {
            let text = row_text(app, index, width)?;
            let has_unread = projection
                .get(index)
                .is_some_and(|entry| entry.feed.has_unread());

            let style = if cursor == Some(index) {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else if has_unread {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Some(ListItem::new(Line::styled(text, style)))
        })
        .collect();

    f.render_widget(List::new(items), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{Feed, SharedFeeds};
    use crate::keybindings::KeybindingRegistry;
    use crate::screen::{ScreenController, ScreenSettings, StatusSink};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    #[test]
    fn test_row_text_strips_escapes() {
        let mut feed = Feed::new("evil\x1b[2Jtitle");
        feed.description = "ring\x07".to_string();
        let settings = ScreenSettings {
            row_format: "%t %d".to_string(),
            ..ScreenSettings::default()
        };
        let notices = StatusSink::new();
        let screen = ScreenController::new(
            Arc::new(SharedFeeds::new(vec![feed])),
            settings,
            Arc::new(notices.clone()),
        );
        let (tx, _rx) = mpsc::channel(1);
        let app = App::new(screen, notices, KeybindingRegistry::new(), tx);

        assert_eq!(row_text(&app, 0, 80).as_deref(), Some("eviltitle ring"));
        assert_eq!(row_text(&app, 1, 80), None);
    }
}
