//! Keybinding registry: maps key events to list-screen actions, with
//! overrides from the `[keybindings]` config table.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// Everything a key can trigger on the feed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    NextUnread,
    PrevUnread,
    ToggleShowRead,
    SetFilter,
    SelectFilter,
    ClearFilter,
    SetTag,
    ClearTag,
    GotoTitle,
    CommandLine,
    ReloadSelected,
    ReloadAll,
    CancelPrompt,
    SubmitPrompt,
}

impl Action {
    /// Config name, as used in `[keybindings]`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Quit => "quit",
            Self::NavDown => "down",
            Self::NavUp => "up",
            Self::NextUnread => "next_unread",
            Self::PrevUnread => "prev_unread",
            Self::ToggleShowRead => "toggle_show_read",
            Self::SetFilter => "set_filter",
            Self::SelectFilter => "select_filter",
            Self::ClearFilter => "clear_filter",
            Self::SetTag => "set_tag",
            Self::ClearTag => "clear_tag",
            Self::GotoTitle => "goto_title",
            Self::CommandLine => "command_line",
            Self::ReloadSelected => "reload",
            Self::ReloadAll => "reload_all",
            Self::CancelPrompt => "cancel",
            Self::SubmitPrompt => "submit",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit",
            Self::NavDown => "Move down",
            Self::NavUp => "Move up",
            Self::NextUnread => "Go to next feed with unread items",
            Self::PrevUnread => "Go to previous feed with unread items",
            Self::ToggleShowRead => "Show or hide read feeds",
            Self::SetFilter => "Set filter expression",
            Self::SelectFilter => "Select a predefined filter",
            Self::ClearFilter => "Clear filter",
            Self::SetTag => "Select tag",
            Self::ClearTag => "Clear tag",
            Self::GotoTitle => "Go to feed by title",
            Self::CommandLine => "Open command line",
            Self::ReloadSelected => "Reload selected feed",
            Self::ReloadAll => "Reload all feeds",
            Self::CancelPrompt => "Cancel input",
            Self::SubmitPrompt => "Submit input",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    FeedList,
    Prompt,
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a key string from config.
///
/// Accepts a single character (`"q"`, `"/"`), a named key (`"Enter"`, `"Esc"`,
/// `"Tab"`, `"Up"`, `"Down"`, `"Left"`, `"Right"`, `"Backspace"`, `"Space"`),
/// `"Ctrl+<char>"` or `"F1"` to `"F12"`.
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        let c = chars.next()?;
        return chars.next().is_none().then_some(KeySpec::ctrl(c));
    }

    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "backspace" => Some(KeyCode::Backspace),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    if let Some(n) = s
        .strip_prefix(['F', 'f'])
        .and_then(|rest| rest.parse::<u8>().ok())
    {
        if (1..=12).contains(&n) {
            return Some(KeySpec::plain(KeyCode::F(n)));
        }
    }

    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(KeySpec::char(c))
}

/// Human-readable key name, for the help line.
pub fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

fn parse_action_name(name: &str) -> Option<Action> {
    let action = match name.to_lowercase().as_str() {
        "quit" => Action::Quit,
        "down" | "nav_down" => Action::NavDown,
        "up" | "nav_up" => Action::NavUp,
        "next_unread" | "nextunread" => Action::NextUnread,
        "prev_unread" | "prevunread" | "previous_unread" => Action::PrevUnread,
        "toggle_show_read" | "toggle_show_read_feeds" => Action::ToggleShowRead,
        "set_filter" | "setfilter" => Action::SetFilter,
        "select_filter" | "selectfilter" => Action::SelectFilter,
        "clear_filter" | "clearfilter" => Action::ClearFilter,
        "set_tag" | "settag" => Action::SetTag,
        "clear_tag" | "cleartag" => Action::ClearTag,
        "goto_title" | "goto" => Action::GotoTitle,
        "command_line" | "cmdline" => Action::CommandLine,
        "reload" | "reload_selected" => Action::ReloadSelected,
        "reload_all" | "reloadall" => Action::ReloadAll,
        "cancel" => Action::CancelPrompt,
        "submit" => Action::SubmitPrompt,
        _ => return None,
    };
    Some(action)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

const DEFAULT_BINDINGS: &[(Context, KeySpec, Action)] = &[
    (Context::FeedList, KeySpec::char('q'), Action::Quit),
    (Context::FeedList, KeySpec::char('j'), Action::NavDown),
    (Context::FeedList, KeySpec::plain(KeyCode::Down), Action::NavDown),
    (Context::FeedList, KeySpec::char('k'), Action::NavUp),
    (Context::FeedList, KeySpec::plain(KeyCode::Up), Action::NavUp),
    (Context::FeedList, KeySpec::char('n'), Action::NextUnread),
    (Context::FeedList, KeySpec::char('p'), Action::PrevUnread),
    (Context::FeedList, KeySpec::char('l'), Action::ToggleShowRead),
    (Context::FeedList, KeySpec::char('F'), Action::SetFilter),
    (Context::FeedList, KeySpec::char('f'), Action::SelectFilter),
    (Context::FeedList, KeySpec::ctrl('f'), Action::ClearFilter),
    (Context::FeedList, KeySpec::char('t'), Action::SetTag),
    (Context::FeedList, KeySpec::ctrl('t'), Action::ClearTag),
    (Context::FeedList, KeySpec::char('/'), Action::GotoTitle),
    (Context::FeedList, KeySpec::char(':'), Action::CommandLine),
    (Context::FeedList, KeySpec::char('r'), Action::ReloadSelected),
    (Context::FeedList, KeySpec::char('R'), Action::ReloadAll),
    (Context::Prompt, KeySpec::plain(KeyCode::Esc), Action::CancelPrompt),
    (Context::Prompt, KeySpec::plain(KeyCode::Enter), Action::SubmitPrompt),
];

/// Registry of keybindings, defaults plus config overrides.
#[derive(Debug, Clone)]
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// Registration order, for the help line.
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        for &(context, key, action) in DEFAULT_BINDINGS {
            registry.bind(context, key, action);
        }
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    /// Replace the default keys of each named action. Returns one warning per
    /// entry that could not be applied.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = self
                .bindings
                .iter()
                .filter(|(_, _, a)| *a == action)
                .map(|(c, _, _)| *c)
                .collect();
            contexts.dedup();

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for context in contexts {
                self.bind(context, key, action);
            }

            tracing::info!(action = %action_name, key = %key_str, "Applied keybinding override");
        }

        warnings
    }

    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        // Shift only changes the character for letter keys; crossterm reports
        // it alongside the uppercase char.
        let modifiers = match code {
            KeyCode::Char(_) => modifiers.difference(KeyModifiers::SHIFT),
            _ => modifiers,
        };
        self.lookup
            .get(&(context, KeySpec::new(code, modifiers)))
            .copied()
    }

    /// First key bound to `action` in `context`.
    pub fn key_for(&self, action: Action, context: Context) -> Option<KeySpec> {
        self.bindings
            .iter()
            .find(|(c, _, a)| *c == context && *a == action)
            .map(|(_, k, _)| *k)
    }

    /// `"key:description"` pairs for the given actions, for the help line.
    pub fn hints(&self, actions: &[Action]) -> Vec<(String, &'static str)> {
        actions
            .iter()
            .filter_map(|&action| {
                self.key_for(action, Context::FeedList)
                    .map(|key| (format_key(&key), action.describe()))
            })
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
