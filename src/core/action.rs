//! # Actions
//!
//! Everything that can happen in the chat client becomes an `Action`.
//! A chat line arrives? That's `Action::Inbound(InboundEvent::Chat(msg))`.
//! User presses Enter? That's `Action::Submit(text)`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing I/O for the caller to run.
//! No side effects here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Known ordering caveat: our own messages are echoed locally the moment
//! they are submitted, before the server sees them, so they can land ahead
//! of chat lines that were already in flight.

use log::{debug, info};
use serde::Serialize;

use crate::core::mention::is_self_mention;
use crate::core::message::{DisplayLine, InboundEvent};
use crate::core::scroll::ScrollCommand;
use crate::core::state::App;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Action {
    /// The chat viewport changed size (inner rows/columns of the message pane).
    Resize { width: u16, height: u16 },
    /// An item from the message bridge.
    Inbound(InboundEvent),
    /// User pressed Enter with this input box content.
    Submit(String),
    /// A send spawned earlier came back with an error.
    SendFailed { text: String, reason: String },
    Scroll(ScrollCommand),
    Quit,
}

/// I/O the event loop must perform after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Transmit this text to the channel.
    Send(String),
    /// Close the bridge, disconnect the transport, exit the loop.
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Resize { width, height } => {
            debug!("Viewport resized to {width}x{height}");
            app.scroll.resize(height as usize, app.history.len());
            Effect::None
        }
        Action::Inbound(event) => {
            apply_inbound(app, event);
            Effect::None
        }
        Action::Submit(text) => {
            if !app.session.authenticated || text.trim().is_empty() {
                return Effect::None;
            }
            let highlighted = is_self_mention(&text, &app.session.username, app.mention);
            let echo = DisplayLine::echo(&app.session.username, app.self_color, &text, highlighted);
            app.push_line(echo);
            Effect::Send(text)
        }
        Action::SendFailed { text, reason } => {
            debug!("Send failed for {} bytes: {reason}", text.len());
            app.push_line(DisplayLine::system(format!("Failed to send message: {reason}")));
            Effect::None
        }
        Action::Scroll(command) => {
            app.scroll.apply(command, app.history.len());
            Effect::None
        }
        Action::Quit => {
            info!("Quit requested");
            Effect::Quit
        }
    }
}

fn apply_inbound(app: &mut App, event: InboundEvent) {
    match event {
        InboundEvent::Chat(message) => {
            let highlighted = is_self_mention(&message.text, &app.session.username, app.mention);
            app.push_line(DisplayLine::chat(&message, highlighted));
        }
        InboundEvent::Joined(channel) => {
            info!("Joined #{channel}");
            app.status_message = format!("Connected to #{channel}");
            app.push_line(DisplayLine::system(format!("Joined #{channel}")));
        }
        InboundEvent::Notice(text) => {
            app.push_line(DisplayLine::system(format!("Notice: {text}")));
        }
        InboundEvent::Reconnecting => {
            app.status_message = "Reconnecting...".to_string();
            app.push_line(DisplayLine::system("Server requested a reconnect"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mention::MentionMatch;
    use crate::core::message::{ChatMessage, LineKind, Rgb};
    use crate::test_support::test_app;

    fn chat(sender: &str, text: &str) -> Action {
        Action::Inbound(InboundEvent::Chat(ChatMessage::new(sender, "#00FF00", text)))
    }

    #[test]
    fn inbound_messages_keep_arrival_order() {
        let mut app = test_app(false);
        app.scroll.resize(10, 0);
        for i in 0..100 {
            assert_eq!(update(&mut app, chat("bob", &format!("msg {i}"))), Effect::None);
        }
        assert_eq!(app.history.len(), 100);
        for (i, line) in app.history.iter().enumerate() {
            assert_eq!(line.plain_text(), format!("bob: msg {i}"));
        }
    }

    #[test]
    fn highlight_iff_username_in_text() {
        let mut app = test_app(false);
        update(&mut app, chat("bob", "hey alice, look"));
        update(&mut app, chat("bob", "nothing to see"));
        update(&mut app, chat("bob", "alice2 is a different person"));
        let flags: Vec<bool> = app.history.iter().map(|l| l.highlighted).collect();
        assert_eq!(flags, [true, false, true]);
    }

    #[test]
    fn word_rule_skips_partial_names() {
        let mut app = test_app(false);
        app.mention = MentionMatch::Word;
        update(&mut app, chat("bob", "alice2 is a different person"));
        update(&mut app, chat("bob", "@alice hi"));
        let flags: Vec<bool> = app.history.iter().map(|l| l.highlighted).collect();
        assert_eq!(flags, [false, true]);
    }

    #[test]
    fn invalid_sender_color_falls_back() {
        let mut app = test_app(false);
        let msg = ChatMessage::new("bob", "notacolor", "hi");
        update(&mut app, Action::Inbound(InboundEvent::Chat(msg)));
        assert_eq!(app.history[0].color, Rgb::WHITE);
    }

    #[test]
    fn submit_echoes_once_and_requests_send() {
        let mut app = test_app(true);
        let effect = update(&mut app, Action::Submit("hello".to_string()));
        assert_eq!(effect, Effect::Send("hello".to_string()));
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.history[0].plain_text(), "alice: hello");
        assert_eq!(app.history[0].kind, LineKind::Echo);
        assert!(!app.history[0].highlighted);
    }

    #[test]
    fn submit_empty_is_noop() {
        let mut app = test_app(true);
        assert_eq!(update(&mut app, Action::Submit(String::new())), Effect::None);
        assert_eq!(update(&mut app, Action::Submit("   ".to_string())), Effect::None);
        assert!(app.history.is_empty());
    }

    #[test]
    fn submit_when_anonymous_is_noop() {
        let mut app = test_app(false);
        assert_eq!(update(&mut app, Action::Submit("hello".to_string())), Effect::None);
        assert!(app.history.is_empty());
    }

    #[test]
    fn echo_applies_self_mention_rule() {
        let mut app = test_app(true);
        update(&mut app, Action::Submit("talking about alice".to_string()));
        assert!(app.history[0].highlighted);
    }

    #[test]
    fn send_failure_becomes_system_line() {
        let mut app = test_app(true);
        update(&mut app, Action::Submit("hello".to_string()));
        let effect = update(
            &mut app,
            Action::SendFailed {
                text: "hello".to_string(),
                reason: "connection closed".to_string(),
            },
        );
        assert_eq!(effect, Effect::None);
        assert_eq!(app.history.len(), 2);
        assert_eq!(app.history[1].kind, LineKind::System);
        assert_eq!(app.history[1].plain_text(), "Failed to send message: connection closed");
    }

    #[test]
    fn joined_updates_status() {
        let mut app = test_app(false);
        update(&mut app, Action::Inbound(InboundEvent::Joined("teststream".to_string())));
        assert_eq!(app.status_message, "Connected to #teststream");
        assert_eq!(app.history[0].plain_text(), "Joined #teststream");
    }

    #[test]
    fn resize_does_not_touch_history() {
        let mut app = test_app(false);
        for i in 0..30 {
            update(&mut app, chat("bob", &format!("{i}")));
        }
        update(&mut app, Action::Resize { width: 80, height: 10 });
        assert_eq!(app.history.len(), 30);
        assert_eq!(app.scroll.offset(), 20);

        update(&mut app, Action::Resize { width: 80, height: 40 });
        assert_eq!(app.history.len(), 30);
        assert_eq!(app.scroll.offset(), 0);
    }

    #[test]
    fn scroll_invariant_after_appends_and_resizes() {
        let mut app = test_app(false);
        app.max_history = 25;
        for i in 0..60u16 {
            update(&mut app, chat("bob", "x"));
            if i % 7 == 0 {
                update(&mut app, Action::Resize { width: 80, height: i % 13 });
            }
            if i % 5 == 0 {
                update(&mut app, Action::Scroll(ScrollCommand::PageUp));
            }
            let len = app.history.len();
            assert!(app.scroll.offset() <= len.saturating_sub(app.scroll.view_height()));
        }
    }

    #[test]
    fn quit_requests_quit_effect() {
        let mut app = test_app(false);
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
