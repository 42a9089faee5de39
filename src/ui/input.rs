//! Keyboard input for the list screen and its prompt.

use crate::app::{App, Prompt, PromptKind};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::screen::{Navigation, RefreshScope, ScreenError};
use crossterm::event::{KeyCode, KeyModifiers};

use super::Action;

/// Longest accepted prompt input, in chars.
const MAX_PROMPT_LENGTH: usize = 512;

pub(super) fn handle_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    let action = if app.prompt.is_some() {
        handle_prompt_input(app, code, modifiers);
        Action::Continue
    } else {
        handle_list_input(app, code, modifiers)
    };
    app.collect_notices();
    action
}

fn handle_list_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::FeedList)
    else {
        return Action::Continue;
    };

    match action {
        KbAction::Quit => return Action::Quit,
        KbAction::NavDown => {
            app.screen.move_down();
        }
        KbAction::NavUp => {
            app.screen.move_up();
        }
        KbAction::NextUnread => {
            app.screen.navigate(Navigation::NextUnread);
        }
        KbAction::PrevUnread => {
            app.screen.navigate(Navigation::PreviousUnread);
        }
        KbAction::ToggleShowRead => {
            app.screen.toggle_show_read();
            let msg = if app.screen.filter().enabled {
                "Hiding read feeds"
            } else {
                "Showing read feeds"
            };
            app.set_status(msg);
        }
        KbAction::SetFilter => app.prompt = Some(Prompt::new(PromptKind::Filter)),
        KbAction::SelectFilter => {
            let names: Vec<String> = app
                .screen
                .settings()
                .filters
                .iter()
                .map(|f| f.name.clone())
                .collect();
            if names.is_empty() {
                app.set_error(ScreenError::NoFilters.to_string());
            } else {
                app.prompt = Some(Prompt::new(PromptKind::NamedFilter).with_choices(names));
            }
        }
        KbAction::ClearFilter => {
            app.screen.clear_filter();
            app.set_status("Filter cleared");
        }
        KbAction::SetTag => {
            let tags = app.screen.available_tags();
            if tags.is_empty() {
                app.set_error(ScreenError::NoTags.to_string());
            } else {
                app.prompt = Some(Prompt::new(PromptKind::Tag).with_choices(tags));
            }
        }
        KbAction::ClearTag => app.screen.clear_tag(),
        KbAction::GotoTitle => app.prompt = Some(Prompt::new(PromptKind::Goto)),
        KbAction::CommandLine => app.prompt = Some(Prompt::new(PromptKind::Command)),
        KbAction::ReloadSelected => app.request_refresh(RefreshScope::Selected),
        KbAction::ReloadAll => app.request_refresh(RefreshScope::All),
        KbAction::CancelPrompt | KbAction::SubmitPrompt => {}
    }

    Action::Continue
}

fn handle_prompt_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Prompt)
    {
        Some(KbAction::CancelPrompt) => {
            app.prompt = None;
            return;
        }
        Some(KbAction::SubmitPrompt) => {
            if let Some(prompt) = app.prompt.take() {
                submit_prompt(app, prompt);
            }
            return;
        }
        _ => {}
    }

    let Some(prompt) = app.prompt.as_mut() else {
        return;
    };
    match code {
        KeyCode::Backspace => {
            prompt.input.pop();
        }
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            if prompt.input.chars().count() < MAX_PROMPT_LENGTH {
                prompt.input.push(c);
            }
        }
        _ => {}
    }
}

/// Run the prompt's input. Errors have already been reported through the
/// screen's notices.
fn submit_prompt(app: &mut App, prompt: Prompt) {
    let input = prompt.input.trim();
    let result = match prompt.kind {
        PromptKind::Filter => app.screen.apply_filter(input),
        PromptKind::NamedFilter => app.screen.select_filter(input),
        PromptKind::Tag => app.screen.set_tag(input),
        PromptKind::Goto => {
            app.screen.goto_title(input);
            Ok(())
        }
        PromptKind::Command => app.screen.handle_command(input),
    };
    if let Err(e) = result {
        tracing::debug!(error = %e, kind = ?prompt.kind, "Prompt input rejected");
    }
}
