//! # Chat Records
//!
//! The data that flows from the transport to the screen:
//!
//! ```text
//! twitch-irc Privmsg ──normalize──▶ ChatMessage ──bridge──▶ DisplayLine
//!                                   (transport side)        (render loop)
//! ```
//!
//! `DisplayLine` keeps style as values (`Rgb`, `highlighted`, `LineKind`) so
//! the core never embeds terminal escape codes. The TUI maps these to ratatui
//! styles at render time.

use chrono::{DateTime, Local};
use serde::Serialize;

/// A chat message as delivered by the transport. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub sender: String,
    /// `#RRGGBB`, or empty when the sender never picked a color.
    pub sender_color: String,
    pub text: String,
}

impl ChatMessage {
    pub fn new(sender: impl Into<String>, sender_color: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            sender_color: sender_color.into(),
            text: text.into(),
        }
    }
}

/// Everything the transport can publish into the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum InboundEvent {
    Chat(ChatMessage),
    /// The local user joined the channel (connection is live).
    Joined(String),
    /// Server notice, e.g. a failed login or a slow-mode warning.
    Notice(String),
    /// Server asked us to reconnect; the library handles it.
    Reconnecting,
}

/// 24-bit color value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
    /// Background for lines that mention the local user.
    pub const HIGHLIGHT: Rgb = Rgb::new(0x8B, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `#RGB`. The `#` is optional, digits are case-insensitive.
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let digits = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
        // from_str_radix alone would accept a leading '+'
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
                Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
            }
            3 => {
                // #abc expands to #aabbcc
                let channel = |i: usize| {
                    u8::from_str_radix(&digits[i..i + 1], 16)
                        .ok()
                        .map(|v| v * 0x11)
                };
                Some(Rgb::new(channel(0)?, channel(1)?, channel(2)?))
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Resolve a sender color, falling back to white. Never fails.
pub fn resolve_color(hex: &str) -> Rgb {
    Rgb::from_hex(hex).unwrap_or(Rgb::WHITE)
}

/// Where a display line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineKind {
    /// Inbound chat from the channel.
    Chat,
    /// Optimistic local echo of something we sent.
    Echo,
    /// Client-generated status (join, notice, send failure).
    System,
}

/// One entry in the display history.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayLine {
    pub kind: LineKind,
    /// Empty for system lines.
    pub sender: String,
    pub color: Rgb,
    pub text: String,
    /// Self-mention: the text is drawn on a highlight background.
    pub highlighted: bool,
    pub received_at: DateTime<Local>,
}

impl DisplayLine {
    pub fn chat(message: &ChatMessage, highlighted: bool) -> Self {
        Self {
            kind: LineKind::Chat,
            sender: message.sender.clone(),
            color: resolve_color(&message.sender_color),
            text: message.text.clone(),
            highlighted,
            received_at: Local::now(),
        }
    }

    pub fn echo(username: &str, color: Rgb, text: &str, highlighted: bool) -> Self {
        Self {
            kind: LineKind::Echo,
            sender: username.to_string(),
            color,
            text: text.to_string(),
            highlighted,
            received_at: Local::now(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::System,
            sender: String::new(),
            color: Rgb::WHITE,
            text: text.into(),
            highlighted: false,
            received_at: Local::now(),
        }
    }

    /// The line without any styling: `"sender: text"`, or just the text for system lines.
    pub fn plain_text(&self) -> String {
        match self.kind {
            LineKind::System => self.text.clone(),
            LineKind::Chat | LineKind::Echo => format!("{}: {}", self.sender, self.text),
        }
    }
}
