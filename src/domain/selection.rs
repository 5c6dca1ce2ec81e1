use std::ops::Range;

/// Rows kept between the cursor and the viewport edge while scrolling
pub const DEFAULT_SCROLL_MARGIN: usize = 8;

/// Cursor and scroll position over a listing of `count` rows.
///
/// `cursor` is `None` exactly when the listing is empty. Every transition
/// consumes the state and returns the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionState {
    pub cursor: Option<usize>,
    pub scroll_offset: usize,
    pub viewport_height: usize,
    pub count: usize,
    pub scroll_margin: usize,
}

impl SelectionState {
    pub fn new(count: usize, viewport_height: usize, scroll_margin: usize) -> Self {
        Self {
            cursor: if count == 0 { None } else { Some(0) },
            scroll_offset: 0,
            viewport_height: viewport_height.max(1),
            count,
            scroll_margin,
        }
    }

    /// Largest scroll offset that still fills the viewport
    pub fn max_scroll(&self) -> usize {
        self.count.saturating_sub(self.viewport_height)
    }

    pub fn move_down(self) -> Self {
        let Some(cursor) = self.cursor else {
            return self;
        };

        if cursor + 1 >= self.count {
            return Self {
                cursor: Some(0),
                scroll_offset: 0,
                ..self
            };
        }

        let cursor = cursor + 1;
        let mut scroll_offset = self.scroll_offset;
        if cursor + self.scroll_margin >= scroll_offset + self.viewport_height {
            scroll_offset = (scroll_offset + 1).min(self.max_scroll());
        }

        Self {
            cursor: Some(cursor),
            scroll_offset,
            ..self
        }
    }

    pub fn move_up(self) -> Self {
        let Some(cursor) = self.cursor else {
            return self;
        };

        if cursor == 0 {
            return Self {
                cursor: Some(self.count - 1),
                scroll_offset: self.max_scroll(),
                ..self
            };
        }

        let cursor = cursor - 1;
        let mut scroll_offset = self.scroll_offset;
        if cursor < scroll_offset + self.scroll_margin {
            scroll_offset = scroll_offset.saturating_sub(1);
        }

        Self {
            cursor: Some(cursor),
            scroll_offset,
            ..self
        }
    }

    /// Re-clamps after the listing was rebuilt with `count` rows.
    ///
    /// The cursor keeps its index when possible so the following file slides
    /// under it after a move or delete.
    pub fn with_count(self, count: usize) -> Self {
        Self { count, ..self }.clamped()
    }

    /// Re-clamps after the viewport changed height
    pub fn with_viewport(self, viewport_height: usize) -> Self {
        Self {
            viewport_height: viewport_height.max(1),
            ..self
        }
        .clamped()
    }

    /// Row range currently on screen
    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.scroll_offset + self.viewport_height).min(self.count);
        self.scroll_offset.min(end)..end
    }

    fn clamped(self) -> Self {
        if self.count == 0 {
            return Self {
                cursor: None,
                scroll_offset: 0,
                ..self
            };
        }

        let cursor = self.cursor.unwrap_or(0).min(self.count - 1);
        let mut scroll_offset = self.scroll_offset.min(self.max_scroll());

        // Keep the cursor on screen
        if cursor < scroll_offset {
            scroll_offset = cursor;
        } else if cursor >= scroll_offset + self.viewport_height {
            scroll_offset = cursor + 1 - self.viewport_height;
        }

        Self {
            cursor: Some(cursor),
            scroll_offset,
            ..self
        }
    }
}
