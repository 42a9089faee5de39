//! Row and title-line rendering for the feed list.

use crate::feed::Feed;
use crate::format::{Fields, TemplateEngine};
use crate::projection::{Projection, VisibleEntry};

pub const DEFAULT_ROW_FORMAT: &str = "%4i %n %11u %t";
pub const DEFAULT_TITLE_FORMAT: &str = "%N %V - Your feeds (%u unread, %t total)%?T? - tag `%T'&?";

const NO_TITLE: &str = "<no title>";

/// Title to show for `feed`: its title, else its source URL, else a
/// placeholder.
pub fn display_title(feed: &Feed) -> &str {
    if !feed.title.is_empty() {
        &feed.title
    } else if !feed.source_url.is_empty() {
        &feed.source_url
    } else {
        NO_TITLE
    }
}

/// Format fields for one visible entry. `rank` is 1-based.
///
/// Feed text is passed through unchanged; terminal escapes are the drawing
/// layer's concern.
pub fn row_fields(entry: VisibleEntry<'_>, rank: usize) -> Fields {
    let feed = entry.feed;
    Fields::new()
        .with('i', rank.to_string())
        .with('I', (entry.real_position + 1).to_string())
        .with('u', format!("({}/{})", feed.unread_count, feed.total_count))
        .with('n', if feed.has_unread() { "N" } else { " " })
        .with('t', display_title(feed))
        .with('T', feed.first_tag())
        .with('l', feed.link.as_str())
        .with('L', feed.source_url.as_str())
        .with('d', feed.description.as_str())
}

/// Expand `template` for one entry. Pure: neither the feed nor the
/// projection is touched.
pub fn render_row(
    engine: &dyn TemplateEngine,
    template: &str,
    entry: VisibleEntry<'_>,
    rank: usize,
    width: usize,
) -> String {
    engine.expand(template, &row_fields(entry, rank), width)
}

/// Format fields for the list's title line.
pub fn title_fields(projection: &Projection, tag: &str) -> Fields {
    Fields::new()
        .with('N', env!("CARGO_PKG_NAME"))
        .with('V', env!("CARGO_PKG_VERSION"))
        .with('u', projection.unread_count().to_string())
        .with('t', projection.shown_count().to_string())
        .with('T', tag)
}

pub fn render_title(
    engine: &dyn TemplateEngine,
    template: &str,
    projection: &Projection,
    tag: &str,
    width: usize,
) -> String {
    engine.expand(template, &title_fields(projection, tag), width)
}
