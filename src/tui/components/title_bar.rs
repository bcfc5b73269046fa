//! # TitleBar Component
//!
//! Top status bar showing the channel, connection status, and a "↓ New"
//! marker when the user is scrolled back and newer lines have arrived.
//!
//! Purely presentational: all data comes in as props.
//!
//! ## Conditional Formatting
//!
//! 1. **Unseen content**: `"Twitch Chat #channel | Connected to #channel | ↓ New"`
//! 2. **Status message**: `"Twitch Chat #channel | Connected to #channel"`
//! 3. **Default**: `"Twitch Chat #channel"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

pub struct TitleBar {
    pub channel: String,
    /// Connection status (e.g., "Connecting to #channel...")
    pub status_message: String,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
    /// Shown as a dim suffix for anonymous sessions
    pub read_only: bool,
}

impl TitleBar {
    pub fn new(
        channel: String,
        status_message: String,
        has_unseen_content: bool,
        read_only: bool,
    ) -> Self {
        Self {
            channel,
            status_message,
            has_unseen_content,
            read_only,
        }
    }

    fn title_text(&self) -> String {
        let mut title = format!("Twitch Chat #{}", self.channel);
        if !self.status_message.is_empty() {
            title.push_str(" | ");
            title.push_str(&self.status_message);
        }
        if self.has_unseen_content {
            title.push_str(" | ↓ New");
        }
        title
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(self.title_text())];
        if self.read_only {
            spans.push(Span::styled(
                " (read-only)",
                Style::default().add_modifier(Modifier::DIM),
            ));
        }
        frame.render_widget(Line::from(spans), area);
    }
}
