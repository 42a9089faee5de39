//! `%`-style format strings.
//!
//! | syntax | expansion |
//! |---|---|
//! | `%x` | field `x`, empty if unknown |
//! | `%Nx` / `%-Nx` | field `x` right / left aligned to `N` columns |
//! | `%%` | a literal `%` |
//! | `%>c` | repeat `c` so the line fills the width |
//! | `%?x?then&else?` | `then` if field `x` is non-empty, else `else` |
//!
//! Fields are never truncated; fitting text into the widget is the widget's
//! job.

use std::collections::HashMap;

use crate::util::{display_width, pad_to_width, Align};

/// Expands a template against a set of single-letter fields.
pub trait TemplateEngine: Send + Sync {
    fn expand(&self, template: &str, fields: &Fields, width: usize) -> String;
}

/// Field values keyed by their format letter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    values: HashMap<char, String>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: char, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: char, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    /// Value for `key`, or `""`.
    pub fn get(&self, key: char) -> &str {
        self.values.get(&key).map(String::as_str).unwrap_or("")
    }
}

/// The built-in [`TemplateEngine`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatString;

impl TemplateEngine for FormatString {
    fn expand(&self, template: &str, fields: &Fields, width: usize) -> String {
        let chars: Vec<char> = template.chars().collect();
        let mut expander = Expander {
            chars: &chars,
            pos: 0,
            fields,
            fill: None,
        };
        let mut out = expander.run(true);

        if let Some((at, c)) = expander.fill {
            let current = display_width(&out);
            let fill_width = display_width(c.encode_utf8(&mut [0; 4])).max(1);
            if width > current {
                let filler: String = std::iter::repeat(c)
                    .take((width - current) / fill_width)
                    .collect();
                out.insert_str(at, &filler);
            }
        }

        out
    }
}

struct Expander<'a> {
    chars: &'a [char],
    pos: usize,
    fields: &'a Fields,
    /// Byte offset in the output and fill character of the first `%>`.
    fill: Option<(usize, char)>,
}

impl Expander<'_> {
    fn next(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Expand until the end of input. Only the top level may record a fill
    /// point; conditional branches are expanded into a separate buffer.
    fn run(&mut self, top_level: bool) -> String {
        let mut out = String::new();

        while let Some(c) = self.next() {
            if c != '%' {
                out.push(c);
                continue;
            }

            match self.next() {
                None => out.push('%'),
                Some('%') => out.push('%'),
                Some('>') => {
                    if let Some(fill) = self.next() {
                        if top_level && self.fill.is_none() {
                            self.fill = Some((out.len(), fill));
                        }
                    }
                }
                Some('?') => {
                    let expanded = self.conditional();
                    out.push_str(&expanded);
                }
                Some(spec) if spec == '-' || spec.is_ascii_digit() => {
                    let align = if spec == '-' {
                        Align::Left
                    } else {
                        self.pos -= 1;
                        Align::Right
                    };
                    let mut width = 0usize;
                    while let Some(d) = self.peek().and_then(|d| d.to_digit(10)) {
                        width = width.saturating_mul(10).saturating_add(d as usize);
                        self.pos += 1;
                    }
                    if let Some(key) = self.next() {
                        out.push_str(&pad_to_width(self.fields.get(key), width, align));
                    }
                }
                Some(key) => out.push_str(self.fields.get(key)),
            }
        }

        out
    }

    /// Handle `x?then&else?` after the opening `%?`.
    fn conditional(&mut self) -> String {
        let Some(key) = self.next() else {
            return String::new();
        };
        if self.peek() == Some('?') {
            self.pos += 1;
        }

        let then_branch = self.branch(&['&', '?']);
        let else_branch = if self.next() == Some('&') {
            let text = self.branch(&['?']);
            self.next();
            text
        } else {
            Vec::new()
        };

        let chosen = if self.fields.get(key).is_empty() {
            else_branch
        } else {
            then_branch
        };

        let mut inner = Expander {
            chars: &chosen,
            pos: 0,
            fields: self.fields,
            fill: None,
        };
        inner.run(false)
    }

    /// Collect raw template characters up to (not including) one of `stops`.
    /// `%`-escapes are copied through whole so `%?` inside a branch does not
    /// end it.
    fn branch(&mut self, stops: &[char]) -> Vec<char> {
        let mut text = Vec::new();
        while let Some(c) = self.peek() {
            if stops.contains(&c) {
                break;
            }
            self.pos += 1;
            text.push(c);
            if c == '%' {
                if let Some(escaped) = self.next() {
                    text.push(escaped);
                }
            }
        }
        text
    }
}
