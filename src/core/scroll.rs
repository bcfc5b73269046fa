//! Scroll position over the display history, in whole lines.
//!
//! Invariant after every method: `offset <= max(0, len - view_height)`.
//! Every method that can change `len` or `view_height` takes the current
//! history length and re-clamps.

use std::ops::Range;

use serde::Serialize;

/// User scroll requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScrollCommand {
    LineUp,
    LineDown,
    PageUp,
    PageDown,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollState {
    offset: usize,
    view_height: usize,
    /// Pinned to the newest line. Cleared by scrolling up, restored at the bottom.
    follow: bool,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollState {
    pub fn new() -> Self {
        Self {
            offset: 0,
            view_height: 0,
            follow: true,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn view_height(&self) -> usize {
        self.view_height
    }

    pub fn is_following(&self) -> bool {
        self.follow
    }

    pub fn max_offset(&self, len: usize) -> usize {
        len.saturating_sub(self.view_height)
    }

    /// Lines that should be on screen.
    pub fn visible_range(&self, len: usize) -> Range<usize> {
        let start = self.offset.min(len);
        let end = (start + self.view_height).min(len);
        start..end
    }

    /// True when newer lines exist below the visible slice.
    pub fn has_unseen(&self, len: usize) -> bool {
        self.offset < self.max_offset(len)
    }

    /// A line was appended; `len` is the new history length.
    pub fn on_append(&mut self, len: usize) {
        if self.follow {
            self.offset = self.max_offset(len);
        } else {
            self.clamp(len);
        }
    }

    /// `evicted` lines were dropped from the front of the history.
    /// Keeps a scrolled-up view on the same lines.
    pub fn on_evict(&mut self, evicted: usize, len: usize) {
        if !self.follow {
            self.offset = self.offset.saturating_sub(evicted);
        }
        self.on_append(len);
    }

    pub fn resize(&mut self, view_height: usize, len: usize) {
        self.view_height = view_height;
        if self.follow {
            self.offset = self.max_offset(len);
        } else {
            self.clamp(len);
        }
    }

    pub fn apply(&mut self, command: ScrollCommand, len: usize) {
        let page = self.view_height.max(1);
        match command {
            ScrollCommand::LineUp => self.scroll_up(1, len),
            ScrollCommand::PageUp => self.scroll_up(page, len),
            ScrollCommand::LineDown => self.scroll_down(1, len),
            ScrollCommand::PageDown => self.scroll_down(page, len),
            ScrollCommand::Bottom => {
                self.follow = true;
                self.offset = self.max_offset(len);
            }
        }
    }

    fn scroll_up(&mut self, lines: usize, len: usize) {
        self.clamp(len);
        if self.offset == 0 {
            return;
        }
        self.offset -= lines.min(self.offset);
        self.follow = false;
    }

    fn scroll_down(&mut self, lines: usize, len: usize) {
        self.offset = self.offset.saturating_add(lines);
        self.clamp(len);
        if self.offset >= self.max_offset(len) {
            self.follow = true;
        }
    }

    fn clamp(&mut self, len: usize) {
        self.offset = self.offset.min(self.max_offset(len));
    }
}
