use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::message::{DisplayLine, LineKind, Rgb};

/// Timestamp format used when `show_timestamps` is on.
const TIMESTAMP_FORMAT: &str = "%H:%M";

/// Map a core color value onto a terminal color.
pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// A stateless component that turns one `DisplayLine` into a styled ratatui `Line`.
///
/// # Styling
///
/// - **Chat / Echo**: bold sender name in the sender's color, then `": "` and the text
/// - **Highlighted**: the text sits on a dark red background with white foreground
/// - **System**: dark gray italic, no sender prefix
///
/// `ChatLine` is created fresh per line each frame by `MessageList`.
#[derive(Clone, Copy)]
pub struct ChatLine<'a> {
    pub line: &'a DisplayLine,
    pub show_timestamp: bool,
}

impl<'a> ChatLine<'a> {
    pub fn new(line: &'a DisplayLine, show_timestamp: bool) -> Self {
        Self {
            line,
            show_timestamp,
        }
    }

    pub fn to_line(self) -> Line<'a> {
        let mut spans = Vec::with_capacity(4);
        if self.show_timestamp {
            spans.push(Span::styled(
                format!("{} ", self.line.received_at.format(TIMESTAMP_FORMAT)),
                Style::default().add_modifier(Modifier::DIM),
            ));
        }

        match self.line.kind {
            LineKind::System => {
                spans.push(Span::styled(
                    self.line.text.as_str(),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                ));
            }
            LineKind::Chat | LineKind::Echo => {
                spans.push(Span::styled(
                    self.line.sender.as_str(),
                    Style::default()
                        .fg(to_color(self.line.color))
                        .add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::raw(": "));
                let text_style = if self.line.highlighted {
                    Style::default()
                        .bg(to_color(Rgb::HIGHLIGHT))
                        .fg(to_color(Rgb::WHITE))
                } else {
                    Style::default()
                };
                spans.push(Span::styled(self.line.text.as_str(), text_style));
            }
        }

        Line::from(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::ChatMessage;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_chat_line_spans() {
        let display = DisplayLine::chat(&ChatMessage::new("bob", "#1E90FF", "hello"), false);
        let line = ChatLine::new(&display, false).to_line();

        assert_eq!(text_of(&line), "bob: hello");
        let sender = &line.spans[0];
        assert_eq!(sender.style.fg, Some(Color::Rgb(0x1E, 0x90, 0xFF)));
        assert!(sender.style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(line.spans[2].style.bg, None);
    }

    #[test]
    fn test_highlighted_text_has_background() {
        let display = DisplayLine::chat(&ChatMessage::new("bob", "", "hey alice"), true);
        let line = ChatLine::new(&display, false).to_line();

        let body = &line.spans[2];
        assert_eq!(body.content, "hey alice");
        assert_eq!(body.style.bg, Some(Color::Rgb(0x8B, 0, 0)));
        assert_eq!(body.style.fg, Some(Color::Rgb(0xFF, 0xFF, 0xFF)));
        // Missing color resolves to white
        assert_eq!(line.spans[0].style.fg, Some(Color::Rgb(0xFF, 0xFF, 0xFF)));
    }

    #[test]
    fn test_system_line_is_italic_without_prefix() {
        let display = DisplayLine::system("Joined #teststream");
        let line = ChatLine::new(&display, false).to_line();

        assert_eq!(line.spans.len(), 1);
        assert_eq!(text_of(&line), "Joined #teststream");
        assert!(line.spans[0].style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn test_timestamp_prefix() {
        let display = DisplayLine::system("x");
        let line = ChatLine::new(&display, true).to_line();

        let expected = format!("{} ", display.received_at.format("%H:%M"));
        assert_eq!(line.spans[0].content, expected);
        assert_eq!(line.spans.len(), 2);
    }
}
