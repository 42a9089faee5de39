//! The selection index within the current projection.

use crate::projection::Projection;

/// Real position captured before a rebuild, used to find the same feed again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SavedPosition(Option<usize>);

impl SavedPosition {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn real_position(self) -> Option<usize> {
        self.0
    }
}

/// Index into the current projection, or inactive when it is empty.
///
/// Every mutating method takes the projection it is measured against, so the
/// index can be kept in range after each call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    index: Option<usize>,
}

impl Cursor {
    /// Cursor at the first entry, or inactive for an empty projection.
    pub fn at_start(projection: &Projection) -> Self {
        let mut cursor = Self::default();
        cursor.zero(projection);
        cursor
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_active(&self) -> bool {
        self.index.is_some()
    }

    /// Real position under the cursor. `none` when inactive or out of range.
    pub fn save(&self, projection: &Projection) -> SavedPosition {
        SavedPosition(
            self.index
                .and_then(|i| projection.get(i))
                .map(|entry| entry.real_position),
        )
    }

    /// Put the cursor back on the saved feed, or on the first entry if it is
    /// no longer shown. Inactive for an empty projection.
    pub fn restore(&mut self, projection: &Projection, saved: SavedPosition) {
        if projection.is_empty() {
            self.index = None;
            return;
        }
        self.index = Some(
            saved
                .0
                .and_then(|real| projection.index_of(real))
                .unwrap_or(0),
        );
    }

    pub fn zero(&mut self, projection: &Projection) {
        self.index = if projection.is_empty() { None } else { Some(0) };
    }

    /// Keep the index in range for a projection of `new_len` entries.
    pub fn clamp_after_resize(&mut self, new_len: usize) {
        if new_len == 0 {
            self.index = None;
            return;
        }
        let index = self.index.unwrap_or(0);
        self.index = Some(index.min(new_len - 1));
    }

    /// Move to `index` if it is in range. Returns whether the cursor moved.
    pub fn set(&mut self, projection: &Projection, index: usize) -> bool {
        if index >= projection.len() {
            return false;
        }
        let moved = self.index != Some(index);
        self.index = Some(index);
        moved
    }

    /// One entry up, stopping at the top. Returns whether the cursor moved.
    pub fn move_up(&mut self) -> bool {
        match self.index {
            Some(i) if i > 0 => {
                self.index = Some(i - 1);
                true
            }
            _ => false,
        }
    }

    /// One entry down, stopping at the bottom. Returns whether the cursor moved.
    pub fn move_down(&mut self, projection: &Projection) -> bool {
        match self.index {
            Some(i) if i + 1 < projection.len() => {
                self.index = Some(i + 1);
                true
            }
            _ => false,
        }
    }
}
