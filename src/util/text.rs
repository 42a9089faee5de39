use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Width of `s` in terminal columns.
///
/// ```
/// use feedlist::util::display_width;
///
/// assert_eq!(display_width("feeds"), 5);
/// assert_eq!(display_width("新闻"), 4);
/// ```
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Which side of a padded field the text sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Pad `s` with spaces to `width` columns. Text already at least that wide is
/// returned unchanged, never cut.
pub fn pad_to_width(s: &str, width: usize, align: Align) -> Cow<'_, str> {
    let current = display_width(s);
    if current >= width {
        return Cow::Borrowed(s);
    }
    let padding = " ".repeat(width - current);
    Cow::Owned(match align {
        Align::Left => format!("{}{}", s, padding),
        Align::Right => format!("{}{}", padding, s),
    })
}

const ELLIPSIS: &str = "...";

/// Cut `s` to at most `max_width` columns, ending in `...` when anything was
/// dropped. Widths of three columns or less get a plain cut.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let ellipsis_width = display_width(ELLIPSIS);
    let (budget, suffix) = if max_width > ellipsis_width {
        (max_width - ellipsis_width, ELLIPSIS)
    } else {
        (max_width, "")
    };

    let mut used = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }

    Cow::Owned(format!("{}{}", &s[..end], suffix))
}

fn is_stripped_control(c: char) -> bool {
    c == '\u{7f}' || (c < ' ' && !matches!(c, '\t' | '\n' | '\r'))
}

/// Remove terminal control characters and ANSI escape sequences.
///
/// Feed titles and descriptions come from arbitrary remote documents and end
/// up written straight into the terminal. Tab, newline and carriage return are
/// kept. CSI sequences (`ESC [ ... final`) and OSC sequences (`ESC ] ... BEL`
/// or `ESC ] ... ESC \`) are dropped whole; any other ESC is dropped alone.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_stripped_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            match chars.peek() {
                Some('[') => {
                    chars.next();
                    for next in chars.by_ref() {
                        if ('\u{40}'..='\u{7e}').contains(&next) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(next) = chars.next() {
                        if next == '\u{07}' {
                            break;
                        }
                        if next == '\u{1b}' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
            continue;
        }

        if !is_stripped_control(c) {
            out.push(c);
        }
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width_wide_chars() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("日本"), 4);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn test_pad_to_width() {
        assert_eq!(pad_to_width("7", 4, Align::Right), "   7");
        assert_eq!(pad_to_width("ab", 4, Align::Left), "ab  ");
        assert_eq!(pad_to_width("日本", 5, Align::Right), " 日本");
    }

    #[test]
    fn test_pad_never_truncates() {
        let result = pad_to_width("(12/345)", 4, Align::Right);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "(12/345)");
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
        assert_eq!(truncate_to_width("Short", 10), "Short");
        assert_eq!(truncate_to_width("日本語テスト", 7), "日本...");
    }

    #[test]
    fn test_truncate_narrow_widths() {
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("Testing", 3), "Tes");
        assert_eq!(truncate_to_width("日本", 1), "");
    }

    #[test]
    fn test_strip_clean_text_is_borrowed() {
        let input = "line one\n\tline two\r\n";
        let result = strip_control_chars(input);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, input);
    }

    #[test]
    fn test_strip_controls_and_del() {
        assert_eq!(strip_control_chars("a\x00b\x07c\x7fd"), "abcd");
    }

    #[test]
    fn test_strip_csi_sequences() {
        assert_eq!(strip_control_chars("\x1b[1;31mAlert\x1b[0m"), "Alert");
        assert_eq!(strip_control_chars("up\x1b[2Adown"), "updown");
    }

    #[test]
    fn test_strip_osc_sequences() {
        assert_eq!(strip_control_chars("\x1b]0;title\x07rest"), "rest");
        assert_eq!(strip_control_chars("\x1b]0;title\x1b\\rest"), "rest");
    }

    #[test]
    fn test_strip_bare_escape() {
        assert_eq!(strip_control_chars("a\x1bb"), "ab");
    }

    #[test]
    fn test_strip_keeps_unicode() {
        assert_eq!(strip_control_chars("新\x1b[32m闻\x1b[0m"), "新闻");
    }
}
