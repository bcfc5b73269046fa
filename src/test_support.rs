//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::core::state::{App, SessionConfig};
use crate::transport::{ChatTransport, TransportError};

/// Records sends and disconnects instead of talking to a server.
pub struct MockTransport {
    sent: Mutex<Vec<(String, String)>>,
    disconnects: AtomicUsize,
    fail_with: Option<String>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            disconnects: AtomicUsize::new(0),
            fail_with: None,
        }
    }

    /// Every send fails with `TransportError::Send(reason)`.
    pub fn failing(reason: &str) -> Self {
        Self {
            fail_with: Some(reason.to_string()),
            ..Self::new()
        }
    }

    /// `(channel, text)` pairs in send order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn disconnects(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send(&self, channel: &str, text: &str) -> Result<(), TransportError> {
        if let Some(reason) = &self.fail_with {
            return Err(TransportError::Send(reason.clone()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((channel.to_string(), text.to_string()));
        Ok(())
    }

    async fn disconnect(&self) {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
    }
}

/// Creates a test App for `alice` watching `#teststream`.
pub fn test_app(authenticated: bool) -> App {
    App::new(SessionConfig {
        username: "alice".to_string(),
        channel: "teststream".to_string(),
        authenticated,
    })
}
