//! Searches over the current projection.
//!
//! The unread and title searches all walk the projection as a ring starting
//! next to the cursor, through [`scan_ring`]. The entry under the cursor is
//! never a hit.

use thiserror::Error;

use crate::projection::{Projection, VisibleEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Why an absolute jump could not be made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("No feed selected!")]
    EmptyProjection,

    #[error("Position not visible!")]
    NotVisible { number: usize },

    #[error("Invalid position!")]
    OutOfRange { number: usize },
}

/// Search result: the new cursor index and the feed's real position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub index: usize,
    pub real_position: usize,
}

/// Visit every index of a ring of `len` entries except `start`, beginning
/// next to it in `direction`. Returns the first index `accept` takes.
///
/// At most `len - 1` indices are examined. A `start` outside the ring is
/// treated as sitting just before index 0 (forward) or just after the last
/// index (backward), so the whole ring is visited.
pub fn scan_ring<F>(len: usize, start: usize, direction: Direction, mut accept: F) -> Option<usize>
where
    F: FnMut(usize) -> bool,
{
    if len == 0 {
        return None;
    }

    if start >= len {
        return match direction {
            Direction::Forward => (0..len).find(|&i| accept(i)),
            Direction::Backward => (0..len).rev().find(|&i| accept(i)),
        };
    }

    (1..len)
        .map(|step| match direction {
            Direction::Forward => (start + step) % len,
            Direction::Backward => (start + len - step) % len,
        })
        .find(|&i| accept(i))
}

fn scan_entries<F>(projection: &Projection, cursor: usize, direction: Direction, mut accept: F) -> Option<Hit>
where
    F: FnMut(VisibleEntry<'_>) -> bool,
{
    let index = scan_ring(projection.len(), cursor, direction, |i| {
        projection.get(i).is_some_and(&mut accept)
    })?;
    let entry = projection.get(index)?;
    Some(Hit {
        index,
        real_position: entry.real_position,
    })
}

/// Next entry after `cursor` with unread items, wrapping around.
pub fn next_unread(projection: &Projection, cursor: usize) -> Option<Hit> {
    scan_entries(projection, cursor, Direction::Forward, |e| e.feed.has_unread())
}

/// Previous entry before `cursor` with unread items, wrapping around.
pub fn previous_unread(projection: &Projection, cursor: usize) -> Option<Hit> {
    scan_entries(projection, cursor, Direction::Backward, |e| e.feed.has_unread())
}

/// Next entry after `cursor` whose title contains `needle`, ignoring case.
///
/// An empty needle matches nothing.
pub fn goto_by_substring(projection: &Projection, cursor: usize, needle: &str) -> Option<Hit> {
    if needle.is_empty() {
        return None;
    }
    let needle = needle.to_lowercase();
    scan_entries(projection, cursor, Direction::Forward, |e| {
        e.feed.title.to_lowercase().contains(&needle)
    })
}

/// Cursor index for the absolute feed number `number` (`real_position + 1`).
///
/// Numbers above the highest shown real position are out of range; numbers
/// inside that bound whose feed is filtered out are not visible.
pub fn goto_by_displayed_number(projection: &Projection, number: usize) -> Result<usize, NavError> {
    let Some(max_real) = projection.max_real_position() else {
        return Err(NavError::EmptyProjection);
    };

    if number == 0 || number > max_real + 1 {
        return Err(NavError::OutOfRange { number });
    }

    projection
        .index_of(number - 1)
        .ok_or(NavError::NotVisible { number })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::Feed;
    use crate::filter::FilterState;
    use std::sync::Arc;

    fn projection(feeds: Vec<Feed>, filtered: bool) -> Projection {
        Projection::build(Arc::new(feeds), "", &FilterState::new(filtered))
    }

    fn unread(counts: &[u32]) -> Projection {
        projection(
            counts
                .iter()
                .map(|&u| Feed::new("f").with_counts(u, u))
                .collect(),
            false,
        )
    }

    #[test]
    fn test_scan_ring_forward_order() {
        let mut seen = Vec::new();
        scan_ring(5, 2, Direction::Forward, |i| {
            seen.push(i);
            false
        });
        assert_eq!(seen, vec![3, 4, 0, 1]);
    }

    #[test]
    fn test_scan_ring_backward_order() {
        let mut seen = Vec::new();
        scan_ring(5, 2, Direction::Backward, |i| {
            seen.push(i);
            false
        });
        assert_eq!(seen, vec![1, 0, 4, 3]);
    }

    #[test]
    fn test_scan_ring_single_entry_never_accepts_start() {
        assert_eq!(scan_ring(1, 0, Direction::Forward, |_| true), None);
        assert_eq!(scan_ring(0, 0, Direction::Forward, |_| true), None);
    }

    #[test]
    fn test_scan_ring_start_outside_visits_all() {
        let mut seen = Vec::new();
        scan_ring(3, 9, Direction::Backward, |i| {
            seen.push(i);
            false
        });
        assert_eq!(seen, vec![2, 1, 0]);
    }

    #[test]
    fn test_next_unread_wraps() {
        let p = unread(&[1, 0, 0, 2, 0]);
        assert_eq!(next_unread(&p, 3).map(|h| h.index), Some(0));
        assert_eq!(next_unread(&p, 0).map(|h| h.index), Some(3));
    }

    #[test]
    fn test_previous_unread_wraps() {
        let p = unread(&[1, 0, 0, 2, 0]);
        assert_eq!(previous_unread(&p, 0).map(|h| h.index), Some(3));
        assert_eq!(previous_unread(&p, 4).map(|h| h.index), Some(3));
    }

    #[test]
    fn test_no_unread_anywhere() {
        let p = unread(&[0, 0, 0]);
        assert_eq!(next_unread(&p, 1), None);
        assert_eq!(previous_unread(&p, 1), None);
    }

    #[test]
    fn test_only_unread_is_under_cursor() {
        let p = projection(
            vec![
                Feed::new("a"),
                Feed::new("b").with_counts(2, 2),
                Feed::new("c"),
            ],
            true,
        );
        assert_eq!(p.len(), 1);
        assert_eq!(next_unread(&p, 0), None);
        assert_eq!(previous_unread(&p, 0), None);
    }

    #[test]
    fn test_goto_by_substring_case_insensitive() {
        let p = projection(
            vec![
                Feed::new("Rust Blog"),
                Feed::new("LWN"),
                Feed::new("This Week in RUST"),
            ],
            false,
        );
        let hit = goto_by_substring(&p, 0, "rust").unwrap();
        assert_eq!(hit.index, 2);
        assert_eq!(hit.real_position, 2);
        assert_eq!(goto_by_substring(&p, 2, "rust").map(|h| h.index), Some(0));
        assert_eq!(goto_by_substring(&p, 0, "nothing"), None);
        assert_eq!(goto_by_substring(&p, 0, ""), None);
    }

    #[test]
    fn test_goto_by_number_not_visible_vs_out_of_range() {
        // five feeds, three shown; real positions 2 and 3 filtered out
        let p = projection(
            vec![
                Feed::new("a").with_counts(1, 1),
                Feed::new("b").with_counts(1, 1),
                Feed::new("c"),
                Feed::new("d"),
                Feed::new("e").with_counts(1, 1),
            ],
            true,
        );
        assert_eq!(p.len(), 3);
        assert_eq!(goto_by_displayed_number(&p, 4), Err(NavError::NotVisible { number: 4 }));
        assert_eq!(goto_by_displayed_number(&p, 5), Ok(2));
        assert_eq!(goto_by_displayed_number(&p, 6), Err(NavError::OutOfRange { number: 6 }));
        assert_eq!(goto_by_displayed_number(&p, 0), Err(NavError::OutOfRange { number: 0 }));
    }

    #[test]
    fn test_goto_by_number_beyond_highest_visible() {
        let p = projection(
            vec![
                Feed::new("a").with_counts(1, 1),
                Feed::new("b").with_counts(1, 1),
                Feed::new("c").with_counts(1, 1),
                Feed::new("d"),
                Feed::new("e"),
            ],
            true,
        );
        assert_eq!(goto_by_displayed_number(&p, 4), Err(NavError::OutOfRange { number: 4 }));
        assert_eq!(goto_by_displayed_number(&p, 2), Ok(1));
    }

    #[test]
    fn test_goto_by_number_empty_projection() {
        let p = unread(&[]);
        assert_eq!(goto_by_displayed_number(&p, 1), Err(NavError::EmptyProjection));
    }
}
