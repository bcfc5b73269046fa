//! # InputBox Component
//!
//! The outbound message box. Only constructed for authenticated sessions.
//!
//! ## Responsibilities
//!
//! - Capture text input, up to Twitch's message length limit
//! - Handle editing (backspace, delete, cursor movement, paste)
//! - Handle submission (Enter)
//! - Grow up to `MAX_VISIBLE_ROWS` rows, then scroll internally
//!
//! ## State Management
//!
//! The buffer is internal state. Cursor position and scroll state are
//! encapsulated in `CursorState`.

mod cursor;
mod text_wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::CursorState;
use text_wrap::{
    MAX_VISIBLE_ROWS, VERTICAL_OVERHEAD, inner_width, next_char_boundary, prev_char_boundary,
    row_count, wrap_rows,
};

/// Twitch rejects messages longer than this many characters.
pub const MAX_MESSAGE_CHARS: usize = 500;

const PLACEHOLDER: &str = "Enter text here...";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed)
    Submit(String),
    /// Text or cursor changed; the box height may have changed too
    ContentChanged,
}

/// Single-line text input with visual wrapping.
///
/// # State
///
/// - `buffer`: Current text being typed (never contains newlines)
/// - `cursor`: Cursor position and internal scroll (see `CursorState`)
pub struct InputBox {
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Cursor and scroll tracking
    cursor: CursorState,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: CursorState::new(),
        }
    }

    /// Calculate required height for current buffer content, clamped to viewport limits.
    /// Returns value in range [1 + VERTICAL_OVERHEAD, MAX_VISIBLE_ROWS + VERTICAL_OVERHEAD].
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let rows = row_count(&self.buffer, inner_width(area_width));
        rows.min(MAX_VISIBLE_ROWS) + VERTICAL_OVERHEAD
    }

    /// Insert text at the cursor, stopping at the message length limit.
    fn insert(&mut self, text: &str) -> bool {
        let room = MAX_MESSAGE_CHARS.saturating_sub(self.buffer.chars().count());
        let accepted: String = text.chars().take(room).collect();
        if accepted.is_empty() {
            return false;
        }
        self.buffer.insert_str(self.cursor.pos, &accepted);
        self.cursor.pos += accepted.len();
        true
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.cursor.update_scroll_offset(&self.buffer, area.width);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .padding(Padding::horizontal(1))
            .title("Send a message");

        let input = if self.buffer.is_empty() {
            Paragraph::new(PLACEHOLDER).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            let rows: Vec<Line> = wrap_rows(&self.buffer, inner_width(area.width))
                .into_iter()
                .skip(self.cursor.scroll_offset as usize)
                .take(MAX_VISIBLE_ROWS as usize)
                .map(Line::raw)
                .collect();
            Paragraph::new(rows)
        };

        frame.render_widget(input.block(block), area);

        let (cursor_x, cursor_y) = self.cursor.screen_pos(&self.buffer, area);
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut encoded = [0u8; 4];
                self.insert(c.encode_utf8(&mut encoded))
                    .then_some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Chat messages are one line
                let flattened = text.replace("\r\n", " ").replace(['\n', '\r'], " ");
                self.insert(&flattened).then_some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor.pos > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                    self.buffer.drain(prev..self.cursor.pos);
                    self.cursor.pos = prev;
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor.pos < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.cursor.pos);
                    self.buffer.drain(self.cursor.pos..next);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => (self.cursor.pos > 0).then(|| {
                self.cursor.pos = prev_char_boundary(&self.buffer, self.cursor.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor.pos < self.buffer.len()).then(|| {
                self.cursor.pos = next_char_boundary(&self.buffer, self.cursor.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => (self.cursor.pos != 0).then(|| {
                self.cursor.pos = 0;
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorEnd => (self.cursor.pos != self.buffer.len()).then(|| {
                self.cursor.pos = self.buffer.len();
                InputEvent::ContentChanged
            }),
            TuiEvent::Submit => {
                if !self.buffer.trim().is_empty() {
                    let text = std::mem::take(&mut self.buffer);
                    self.cursor.reset();
                    Some(InputEvent::Submit(text))
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn type_text(input: &mut InputBox, text: &str) {
        for c in text.chars() {
            input.handle_event(&TuiEvent::InputChar(c));
        }
    }

    #[test]
    fn test_handle_input() {
        let mut input = InputBox::new();

        let res = input.handle_event(&TuiEvent::InputChar('a'));
        assert_eq!(res, Some(InputEvent::ContentChanged));
        assert_eq!(input.buffer, "a");

        let res = input.handle_event(&TuiEvent::InputChar('b'));
        assert_eq!(res, Some(InputEvent::ContentChanged));
        assert_eq!(input.buffer, "ab");

        let res = input.handle_event(&TuiEvent::Backspace);
        assert_eq!(res, Some(InputEvent::ContentChanged));
        assert_eq!(input.buffer, "a");
    }

    #[test]
    fn test_submit_clears_buffer() {
        let mut input = InputBox::new();
        type_text(&mut input, "hello");

        match input.handle_event(&TuiEvent::Submit) {
            Some(InputEvent::Submit(text)) => assert_eq!(text, "hello"),
            other => panic!("Expected Submit event, got {other:?}"),
        }
        assert!(input.buffer.is_empty(), "Buffer should be cleared after submit");
    }

    #[test]
    fn test_submit_empty_is_ignored() {
        let mut input = InputBox::new();
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        type_text(&mut input, "  ");
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
    }

    #[test]
    fn test_cursor_editing_mid_buffer() {
        let mut input = InputBox::new();
        type_text(&mut input, "hllo");
        input.handle_event(&TuiEvent::CursorHome);
        input.handle_event(&TuiEvent::CursorRight);
        input.handle_event(&TuiEvent::InputChar('e'));
        assert_eq!(input.buffer, "hello");

        input.handle_event(&TuiEvent::CursorEnd);
        assert_eq!(input.handle_event(&TuiEvent::Delete), None);
        input.handle_event(&TuiEvent::CursorLeft);
        input.handle_event(&TuiEvent::Delete);
        assert_eq!(input.buffer, "hell");
    }

    #[test]
    fn test_multibyte_backspace() {
        let mut input = InputBox::new();
        type_text(&mut input, "hé😀");
        input.handle_event(&TuiEvent::Backspace);
        assert_eq!(input.buffer, "hé");
        input.handle_event(&TuiEvent::Backspace);
        assert_eq!(input.buffer, "h");
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::Paste("one\ntwo\r\nthree".to_string()));
        assert_eq!(input.buffer, "one two three");
    }

    #[test]
    fn test_length_limit() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::Paste("x".repeat(MAX_MESSAGE_CHARS + 20)));
        assert_eq!(input.buffer.chars().count(), MAX_MESSAGE_CHARS);
        assert_eq!(input.handle_event(&TuiEvent::InputChar('y')), None);
    }

    #[test]
    fn test_height_grows_then_caps() {
        let mut input = InputBox::new();
        // Area width 14 → inner width 10
        assert_eq!(input.calculate_height(14), 3);
        type_text(&mut input, &"a".repeat(15));
        assert_eq!(input.calculate_height(14), 4);
        type_text(&mut input, &"a".repeat(100));
        assert_eq!(input.calculate_height(14), MAX_VISIBLE_ROWS + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_render_shows_placeholder_then_text() {
        let backend = TestBackend::new(40, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut input = InputBox::new();

        terminal.draw(|f| input.render(f, f.area())).unwrap();
        let text: String = terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Send a message"));
        assert!(text.contains("Enter text here..."));

        type_text(&mut input, "hi chat");
        terminal.draw(|f| input.render(f, f.area())).unwrap();
        let text: String = terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("hi chat"));
        assert!(!text.contains("Enter text here..."));
    }
}
