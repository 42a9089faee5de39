//! Top-level layout: title line, feed list, status bar.

use crate::app::App;
use crate::util::strip_control_chars;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    widgets::Paragraph,
    Frame,
};

use super::{feeds, status};

/// Smallest terminal the list screen will draw into.
pub(super) const MIN_WIDTH: u16 = 20;
pub(super) const MIN_HEIGHT: u16 = 3;

pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        f.render_widget(
            Paragraph::new("Too small").alignment(Alignment::Center),
            area,
        );
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    if app.screen.resize(usize::from(area.width)) {
        tracing::debug!(width = area.width, "List width changed");
    }

    let title = app.screen.title_line(usize::from(chunks[0].width));
    let title = strip_control_chars(&title).into_owned();
    f.render_widget(
        Paragraph::new(title).style(Style::default().add_modifier(Modifier::BOLD)),
        chunks[0],
    );

    feeds::render(f, app, chunks[1]);
    status::render(f, app, chunks[2]);
}
