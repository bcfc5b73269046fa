//! # Application State
//!
//! Core chat state. No TUI types here; the input box and terminal size live
//! in `tui::TuiState`.
//!
//! ```text
//! App
//! ├── session: SessionConfig        // username, channel, authenticated
//! ├── history: VecDeque<DisplayLine> // arrival order, capped
//! ├── scroll: ScrollState           // offset over history
//! ├── mention: MentionMatch         // self-mention rule
//! ├── self_color: Rgb               // color for our own echoed lines
//! ├── status_message: String        // title bar text
//! └── max_history: usize            // eviction threshold
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::collections::VecDeque;

use crate::core::config::ResolvedConfig;
use crate::core::mention::MentionMatch;
use crate::core::message::{DisplayLine, Rgb};
use crate::core::scroll::ScrollState;

/// Default cap on retained display lines.
pub const DEFAULT_MAX_HISTORY: usize = 5000;

/// Who we are and where we are. Immutable for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub username: String,
    pub channel: String,
    /// False means anonymous, read-only: no input box, no send.
    pub authenticated: bool,
}

pub struct App {
    pub session: SessionConfig,
    pub history: VecDeque<DisplayLine>,
    pub scroll: ScrollState,
    pub mention: MentionMatch,
    pub self_color: Rgb,
    pub status_message: String,
    pub max_history: usize,
}

impl App {
    pub fn new(session: SessionConfig) -> Self {
        let status_message = format!("Connecting to #{}...", session.channel);
        Self {
            session,
            history: VecDeque::new(),
            scroll: ScrollState::new(),
            mention: MentionMatch::default(),
            self_color: Rgb::new(0xFF, 0x00, 0xFF),
            status_message,
            max_history: DEFAULT_MAX_HISTORY,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        let mut app = Self::new(config.session.clone());
        app.mention = config.mention;
        app.self_color = config.self_color;
        app.max_history = config.max_history.max(1);
        app
    }

    /// Append a line, evicting the oldest past the cap, and keep scroll consistent.
    pub fn push_line(&mut self, line: DisplayLine) {
        self.history.push_back(line);
        let mut evicted = 0;
        while self.history.len() > self.max_history {
            self.history.pop_front();
            evicted += 1;
        }
        if evicted > 0 {
            self.scroll.on_evict(evicted, self.history.len());
        } else {
            self.scroll.on_append(self.history.len());
        }
    }

    /// The slice of history that is on screen.
    pub fn visible_lines(&self) -> impl Iterator<Item = &DisplayLine> {
        self.history.range(self.scroll.visible_range(self.history.len()))
    }
}
