//! # MessageList Component
//!
//! The chat pane: a bordered block showing the visible slice of history.
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that borrows
//! the `App`. Scroll position lives in `App::scroll` and is measured in
//! history entries, so the list itself holds no state. The pane's inner height
//! is fed back to the core as `Action::Resize`; see `ui::chat_viewport`.
//!
//! A long message can wrap to several rows. When that pushes the slice past
//! the pane height, the paragraph is anchored to the bottom while following
//! and to the top while the user is scrolled back.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};

use crate::core::message::DisplayLine;
use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::message::ChatLine;

/// The block the chat pane is drawn in. Shared with layout so the viewport
/// height used for scrolling matches what is rendered.
pub fn chat_block(channel: &str) -> Block<'static> {
    Block::bordered()
        .border_type(BorderType::Rounded)
        .title(format!("#{channel} - Chat"))
}

pub struct MessageList<'a> {
    pub app: &'a App,
    pub show_timestamps: bool,
}

impl<'a> MessageList<'a> {
    pub fn new(app: &'a App, show_timestamps: bool) -> Self {
        Self {
            app,
            show_timestamps,
        }
    }

    fn placeholder(&self) -> Paragraph<'a> {
        let hint = if self.app.session.authenticated {
            "Waiting for chat..."
        } else {
            "Waiting for chat... (read-only, pass --auth to send messages)"
        };
        Paragraph::new(hint).style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = chat_block(&self.app.session.channel);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.app.history.is_empty() {
            frame.render_widget(self.placeholder(), inner);
            return;
        }

        let show_timestamps = self.show_timestamps;
        let to_line =
            |line: &'a DisplayLine| -> Line<'a> { ChatLine::new(line, show_timestamps).to_line() };
        let lines: Vec<Line> = if self.app.scroll.view_height() == 0 {
            // Scroll not sized yet: show the newest lines that fit
            let len = self.app.history.len();
            let start = len.saturating_sub(inner.height as usize);
            self.app.history.range(start..).map(to_line).collect()
        } else {
            self.app.visible_lines().map(to_line).collect()
        };

        let mut paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });

        let wrapped_rows = paragraph.line_count(inner.width);
        let overflow = wrapped_rows.saturating_sub(inner.height as usize);
        if overflow > 0 && self.app.scroll.is_following() {
            let overflow = u16::try_from(overflow).unwrap_or(u16::MAX);
            paragraph = paragraph.scroll((overflow, 0));
        }

        frame.render_widget(paragraph, inner);
    }
}
