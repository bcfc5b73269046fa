//! Cursor position tracking for the InputBox.
//!
//! `CursorState` owns the cursor byte offset and the internal row scroll.
//! All methods accept `buffer: &str` explicitly; the text itself is owned
//! by `InputBox`.

use super::text_wrap::{
    CONTENT_OFFSET_X, CONTENT_OFFSET_Y, MAX_VISIBLE_ROWS, cursor_cell, inner_width, row_count,
};
use ratatui::layout::Rect;

/// Cursor and scroll state, separated from the text buffer.
pub(super) struct CursorState {
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    pub pos: usize,
    /// First visible row (0 when content fits in the box)
    pub scroll_offset: u16,
}

impl CursorState {
    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
        }
    }

    /// Reset cursor to start (used after Submit clears the buffer).
    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_offset = 0;
    }

    /// Update scroll offset to keep the cursor row visible.
    pub fn update_scroll_offset(&mut self, buffer: &str, area_width: u16) {
        let width = inner_width(area_width);
        if row_count(buffer, width) <= MAX_VISIBLE_ROWS {
            self.scroll_offset = 0;
            return;
        }

        let (cursor_row, _) = cursor_cell(buffer, self.pos, width);
        if cursor_row < self.scroll_offset {
            self.scroll_offset = cursor_row;
        } else if cursor_row >= self.scroll_offset + MAX_VISIBLE_ROWS {
            self.scroll_offset = cursor_row + 1 - MAX_VISIBLE_ROWS;
        }
    }

    /// Screen position of the cursor inside `area`, as (column, row).
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let width = inner_width(area.width);
        if width == 0 {
            return (area.x + CONTENT_OFFSET_X.min(area.width), area.y + CONTENT_OFFSET_Y);
        }
        let (row, col) = cursor_cell(buffer, self.pos, width);
        let visible_row = row.saturating_sub(self.scroll_offset);
        (
            area.x + CONTENT_OFFSET_X + col,
            area.y + CONTENT_OFFSET_Y + visible_row,
        )
    }
}
