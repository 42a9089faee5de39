use crate::app::App;
use crate::keybindings::Action as KbAction;
use crate::screen::NoticeLevel;
use crate::util::truncate_to_width;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

const HINT_ACTIONS: &[KbAction] = &[
    KbAction::Quit,
    KbAction::NextUnread,
    KbAction::ToggleShowRead,
    KbAction::SetFilter,
    KbAction::SetTag,
    KbAction::GotoTitle,
    KbAction::ReloadAll,
];

/// Render the prompt if one is open, otherwise the status message or key
/// hints.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }
    let width = usize::from(area.width);
    let base = Style::default().bg(Color::DarkGray).fg(Color::White);

    if let Some(prompt) = &app.prompt {
        let mut line = format!("{}{}", prompt.kind.label(), prompt.input);
        if prompt.input.is_empty() && !prompt.choices.is_empty() {
            line.push_str(&format!("  [{}]", prompt.choices.join(", ")));
        }
        let text = truncate_to_width(&line, width).into_owned();
        f.render_widget(Paragraph::new(text).style(base), area);
        return;
    }

    let (text, style): (Cow<'_, str>, Style) = match &app.status_message {
        Some((msg, NoticeLevel::Error, _)) => (Cow::Borrowed(msg.as_ref()), base.fg(Color::Red)),
        Some((msg, NoticeLevel::Info, _)) => (Cow::Borrowed(msg.as_ref()), base),
        None if app.refreshing => (Cow::Borrowed("Reloading..."), base),
        None => {
            let hints: Vec<String> = app
                .keybindings
                .hints(HINT_ACTIONS)
                .into_iter()
                .map(|(key, desc)| format!("{}:{}", key, desc))
                .collect();
            (Cow::Owned(hints.join("  ")), base)
        }
    };

    let text = truncate_to_width(&text, width).into_owned();
    f.render_widget(Paragraph::new(text).style(style), area);
}
