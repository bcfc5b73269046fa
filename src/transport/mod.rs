//! # Chat Transport
//!
//! The network side of the client. Implementations connect, join one
//! channel, and push everything they receive through a [`Publisher`]. The
//! render loop only talks back through [`ChatTransport`].
//!
//! [`Publisher`]: crate::bridge::Publisher

pub mod twitch;

use std::fmt;

use async_trait::async_trait;

pub use twitch::TwitchTransport;

/// Errors surfaced by a transport.
#[derive(Debug)]
pub enum TransportError {
    /// Bad channel or credentials. Not retryable.
    Config(String),
    /// The library rejected or failed to deliver an outbound message.
    Send(String),
    /// `disconnect()` already ran.
    Closed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Config(msg) => write!(f, "transport config error: {msg}"),
            TransportError::Send(msg) => write!(f, "send error: {msg}"),
            TransportError::Closed => write!(f, "connection closed"),
        }
    }
}

impl std::error::Error for TransportError {}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Returns the name of the transport.
    fn name(&self) -> &str;

    /// Send `text` to `channel`.
    async fn send(&self, channel: &str, text: &str) -> Result<(), TransportError>;

    /// Close the connection. Later sends fail with [`TransportError::Closed`].
    async fn disconnect(&self);
}
