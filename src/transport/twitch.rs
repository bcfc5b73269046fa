//! Twitch chat over `twitch-irc`.
//!
//! The library owns the socket, login, PING/PONG and reconnect backoff.
//! This module only builds the client, joins the channel, and forwards
//! normalized events into the bridge from a background task.

use std::sync::Mutex;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use twitch_irc::login::StaticLoginCredentials;
use twitch_irc::message::{PrivmsgMessage, ServerMessage};
use twitch_irc::{ClientConfig, SecureTCPTransport, TwitchIRCClient};

use super::{ChatTransport, TransportError};
use crate::bridge::{PublishOutcome, Publisher};
use crate::core::message::{ChatMessage, InboundEvent, Rgb};
use crate::core::state::SessionConfig;

type Client = TwitchIRCClient<SecureTCPTransport, StaticLoginCredentials>;

/// Anonymous logins are `justinfan` followed by digits.
const ANONYMOUS_LOGIN_PREFIX: &str = "justinfan";

pub struct TwitchTransport {
    client: Mutex<Option<Client>>,
    forwarder: Mutex<Option<JoinHandle<()>>>,
}

impl TwitchTransport {
    /// Build the client, join `session.channel`, and start forwarding into `publisher`.
    ///
    /// Must be called inside a tokio runtime. `token` is only used for
    /// authenticated sessions.
    pub fn connect(
        session: &SessionConfig,
        token: Option<String>,
        publisher: Publisher,
    ) -> Result<Self, TransportError> {
        let own_login = session.username.to_lowercase();
        let credentials = match (session.authenticated, token) {
            (true, Some(token)) => StaticLoginCredentials::new(own_login.clone(), Some(token)),
            (true, None) => {
                return Err(TransportError::Config(
                    "authenticated session without a token".to_string(),
                ));
            }
            (false, _) => StaticLoginCredentials::anonymous(),
        };

        let (incoming, client) = Client::new(ClientConfig::new_simple(credentials));
        client
            .join(session.channel.clone())
            .map_err(|e| TransportError::Config(format!("invalid channel {:?}: {e}", session.channel)))?;

        info!(
            "Joining #{} ({})",
            session.channel,
            if session.authenticated { "authenticated" } else { "anonymous" }
        );

        let own_login = session.authenticated.then_some(own_login);
        let forwarder = tokio::spawn(forward(incoming, publisher, own_login));

        Ok(Self {
            client: Mutex::new(Some(client)),
            forwarder: Mutex::new(Some(forwarder)),
        })
    }

    fn client(&self) -> Option<Client> {
        self.client.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl ChatTransport for TwitchTransport {
    fn name(&self) -> &str {
        "twitch"
    }

    async fn send(&self, channel: &str, text: &str) -> Result<(), TransportError> {
        let client = self.client().ok_or(TransportError::Closed)?;
        debug!("Sending {} bytes to #{channel}", text.len());
        client
            .say(channel.to_string(), text.to_string())
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }

    async fn disconnect(&self) {
        // Dropping the last client handle closes the connection, which in
        // turn ends the incoming stream the forwarder is reading.
        let client = self.client.lock().ok().and_then(|mut guard| guard.take());
        if client.is_none() {
            debug!("Disconnect called twice, ignoring");
            return;
        }
        drop(client);

        let forwarder = self.forwarder.lock().ok().and_then(|mut guard| guard.take());
        if let Some(handle) = forwarder {
            handle.abort();
        }
        info!("Disconnected from Twitch");
    }
}

/// Drain the library's receiver into the bridge until either side goes away.
async fn forward(
    mut incoming: UnboundedReceiver<ServerMessage>,
    publisher: Publisher,
    own_login: Option<String>,
) {
    let mut forwarded = 0usize;
    while let Some(message) = incoming.recv().await {
        let Some(event) = normalize(message, own_login.as_deref()) else {
            continue;
        };
        match publisher.publish(event).await {
            PublishOutcome::Delivered => forwarded += 1,
            PublishOutcome::Dropped => {}
            PublishOutcome::Closed => {
                debug!("Bridge closed, stopping forwarder");
                break;
            }
        }
    }
    info!("Forwarder finished after {forwarded} events");
}

/// Map a server message to a bridge event. Anything the UI doesn't show is `None`.
///
/// `own_login` is `None` for anonymous sessions.
pub fn normalize(message: ServerMessage, own_login: Option<&str>) -> Option<InboundEvent> {
    match message {
        ServerMessage::Privmsg(privmsg) => Some(InboundEvent::Chat(chat_message(&privmsg))),
        ServerMessage::Join(join) => {
            let is_us = match own_login {
                Some(login) => join.user_login == login,
                None => join.user_login.starts_with(ANONYMOUS_LOGIN_PREFIX),
            };
            is_us.then_some(InboundEvent::Joined(join.channel_login))
        }
        ServerMessage::Notice(notice) => {
            warn!("Server notice: {}", notice.message_text);
            Some(InboundEvent::Notice(notice.message_text))
        }
        ServerMessage::Reconnect(_) => Some(InboundEvent::Reconnecting),
        _ => None,
    }
}

fn chat_message(privmsg: &PrivmsgMessage) -> ChatMessage {
    let sender_color = privmsg
        .name_color
        .as_ref()
        .map(|c| Rgb::new(c.r, c.g, c.b).to_hex())
        .unwrap_or_default();
    ChatMessage::new(privmsg.sender.name.clone(), sender_color, privmsg.message_text.clone())
}
