//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI, and
//! turns terminal events, bridge items and send results into `core::Action`
//! values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! One async task owns `App` and `TuiState` and is the only thing that
//! mutates them. It suspends in a single `tokio::select!`:
//!
//! ```text
//!            ┌── terminal EventStream   (polled first)
//! select! ───┼── bridge Subscription    (one item per wake)
//!            ├── send feedback channel  (SendFailed)
//!            └── JoinSet of sends       (reaped as they finish)
//! ```
//!
//! Every wake produces at most one action, runs it through `update()`,
//! performs the returned `Effect`, and redraws. Sends are spawned so the
//! loop never waits on the network.
//!
//! ## Shutdown
//!
//! `Effect::Quit` closes the bridge, gives in-flight sends up to
//! `SEND_DRAIN_TIMEOUT`, calls `ChatTransport::disconnect()` once, and
//! returns. Nothing is received from the bridge after that.

mod component;
mod components;
pub mod debug_dump;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, Event,
    EventStream, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use futures::{Stream, StreamExt};
use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::bridge::{self, Subscription};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::message::InboundEvent;
use crate::core::scroll::ScrollCommand;
use crate::core::state::App;
use crate::transport::{ChatTransport, TwitchTransport};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent};
use crate::tui::debug_dump::DebugDump;
use crate::tui::event::TuiEvent;

/// How long quit waits for spawned sends before disconnecting anyway.
pub const SEND_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// TUI-specific presentation state (not part of core chat state)
pub struct TuiState {
    /// `None` for anonymous sessions: nothing to type into.
    pub input_box: Option<InputBox>,
    pub terminal_size: (u16, u16),
    pub show_timestamps: bool,
    /// Chat viewport last reported to the core as `Action::Resize`.
    last_viewport: Option<(u16, u16)>,
}

impl TuiState {
    pub fn new(app: &App, terminal_size: (u16, u16), show_timestamps: bool) -> Self {
        Self {
            input_box: app.session.authenticated.then(InputBox::new),
            terminal_size,
            show_timestamps,
            last_viewport: None,
        }
    }

    /// Inner area of the chat pane at the current terminal size and input height.
    pub fn chat_viewport(&self, channel: &str) -> Rect {
        let (width, height) = self.terminal_size;
        let input_height = self.input_box.as_ref().map(|b| b.calculate_height(width));
        ui::chat_viewport(Rect::new(0, 0, width, height), input_height, channel)
    }

    /// A `Resize` action if the chat viewport changed since the last call.
    fn viewport_change(&mut self, channel: &str) -> Option<Action> {
        let viewport = self.chat_viewport(channel);
        let size = (viewport.width, viewport.height);
        if self.last_viewport == Some(size) {
            return None;
        }
        self.last_viewport = Some(size);
        Some(Action::Resize {
            width: size.0,
            height: size.1,
        })
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> io::Result<Self> {
        // The enhancement protocol is ignored by terminals that don't support it
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock, // set_cursor_position resets the blink timer every draw
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// What woke the loop.
enum Wake {
    Terminal(Option<io::Result<Event>>),
    Inbound(Option<InboundEvent>),
    Feedback(Action),
    SendFinished,
}

/// The render loop. Owns all UI state; see the module docs.
pub struct EventLoop {
    app: App,
    tui: TuiState,
    inbound: Subscription,
    inbound_open: bool,
    transport: Arc<dyn ChatTransport>,
    feedback_tx: mpsc::UnboundedSender<Action>,
    feedback_rx: mpsc::UnboundedReceiver<Action>,
    pending_sends: JoinSet<()>,
    dump: Option<DebugDump>,
}

impl EventLoop {
    pub fn new(
        app: App,
        tui: TuiState,
        inbound: Subscription,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        let (feedback_tx, feedback_rx) = mpsc::unbounded_channel();
        Self {
            app,
            tui,
            inbound,
            inbound_open: true,
            transport,
            feedback_tx,
            feedback_rx,
            pending_sends: JoinSet::new(),
            dump: None,
        }
    }

    pub fn with_debug_dump(mut self, dump: DebugDump) -> Self {
        self.dump = Some(dump);
        self
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn tui(&self) -> &TuiState {
        &self.tui
    }

    /// Run until quit. `draw` is called once up front and after every wake.
    ///
    /// Terminal I/O errors from `events` or `draw` end the loop (after a
    /// normal shutdown) and are returned.
    pub async fn run<S, D>(&mut self, events: S, mut draw: D) -> io::Result<()>
    where
        S: Stream<Item = io::Result<Event>>,
        D: FnMut(&App, &mut TuiState) -> io::Result<()>,
    {
        let mut events = pin!(events);
        info!(
            "Event loop started for #{} via {}",
            self.app.session.channel,
            self.transport.name()
        );

        self.sync_viewport();
        if let Err(e) = draw(&self.app, &mut self.tui) {
            self.shutdown().await;
            return Err(e);
        }

        loop {
            let wake = tokio::select! {
                biased;

                event = events.next() => Wake::Terminal(event),
                item = self.inbound.receive(), if self.inbound_open => Wake::Inbound(item),
                Some(action) = self.feedback_rx.recv() => Wake::Feedback(action),
                Some(joined) = self.pending_sends.join_next(), if !self.pending_sends.is_empty() => {
                    if let Err(e) = joined {
                        warn!("Send task failed: {e}");
                    }
                    Wake::SendFinished
                }
            };

            let action = match wake {
                Wake::Terminal(Some(Ok(raw))) => event::translate(raw).and_then(|e| self.handle_tui_event(e)),
                Wake::Terminal(Some(Err(e))) => {
                    warn!("Terminal event stream failed: {e}");
                    self.shutdown().await;
                    return Err(e);
                }
                Wake::Terminal(None) => {
                    info!("Terminal event stream ended");
                    Some(Action::Quit)
                }
                Wake::Inbound(Some(item)) => Some(Action::Inbound(item)),
                Wake::Inbound(None) => {
                    info!("Bridge closed by producer");
                    self.inbound_open = false;
                    None
                }
                Wake::Feedback(action) => Some(action),
                Wake::SendFinished => None,
            };

            if let Some(action) = action {
                match self.dispatch(action) {
                    Effect::None => {}
                    Effect::Send(text) => self.spawn_send(text),
                    Effect::Quit => {
                        self.shutdown().await;
                        return Ok(());
                    }
                }
            }

            // Input box height may have changed (typing, submit clearing it)
            self.sync_viewport();

            if let Err(e) = draw(&self.app, &mut self.tui) {
                self.shutdown().await;
                return Err(e);
            }
        }
    }

    fn dispatch(&mut self, action: Action) -> Effect {
        if let Some(dump) = self.dump.as_mut() {
            dump.record(&action);
        }
        debug!("Event loop processing: {action:?}");
        update(&mut self.app, action)
    }

    fn sync_viewport(&mut self) {
        if let Some(resize) = self.tui.viewport_change(&self.app.session.channel) {
            self.dispatch(resize);
        }
    }

    /// Map a terminal event to a core action. Editing is handled here by the
    /// input box and only surfaces as an action on submit.
    fn handle_tui_event(&mut self, event: TuiEvent) -> Option<Action> {
        match event {
            TuiEvent::Quit => Some(Action::Quit),
            TuiEvent::ScrollUp => Some(Action::Scroll(ScrollCommand::LineUp)),
            TuiEvent::ScrollDown => Some(Action::Scroll(ScrollCommand::LineDown)),
            TuiEvent::ScrollPageUp => Some(Action::Scroll(ScrollCommand::PageUp)),
            TuiEvent::ScrollPageDown => Some(Action::Scroll(ScrollCommand::PageDown)),
            TuiEvent::ScrollToBottom => Some(Action::Scroll(ScrollCommand::Bottom)),
            TuiEvent::Resize(width, height) => {
                self.tui.terminal_size = (width, height);
                None
            }
            editing => {
                // Anonymous sessions have no input box; editing keys do nothing
                let input_box = self.tui.input_box.as_mut()?;
                match input_box.handle_event(&editing)? {
                    InputEvent::Submit(text) => Some(Action::Submit(text)),
                    InputEvent::ContentChanged => None,
                }
            }
        }
    }

    fn spawn_send(&mut self, text: String) {
        let transport = self.transport.clone();
        let channel = self.app.session.channel.clone();
        let feedback = self.feedback_tx.clone();
        self.pending_sends.spawn(async move {
            if let Err(e) = transport.send(&channel, &text).await {
                warn!("Send to #{channel} failed: {e}");
                let failed = Action::SendFailed {
                    text,
                    reason: e.to_string(),
                };
                if feedback.send(failed).is_err() {
                    debug!("Event loop gone, dropping send failure");
                }
            }
        });
    }

    async fn shutdown(&mut self) {
        self.inbound.close();
        self.inbound_open = false;

        let in_flight = self.pending_sends.len();
        if in_flight > 0 {
            info!("Waiting for {in_flight} in-flight sends");
            let drained = tokio::time::timeout(SEND_DRAIN_TIMEOUT, async {
                while self.pending_sends.join_next().await.is_some() {}
            })
            .await;
            if drained.is_err() {
                warn!(
                    "{} sends still pending after {:?}, aborting",
                    self.pending_sends.len(),
                    SEND_DRAIN_TIMEOUT
                );
                self.pending_sends.abort_all();
            }
        }

        self.transport.disconnect().await;
        info!(
            "Event loop stopped ({} lines in history, {} inbound events dropped by overflow)",
            self.app.history.len(),
            self.inbound.dropped()
        );
    }
}

/// Connect, take over the terminal, and run the chat client until quit.
pub async fn run(config: ResolvedConfig, debug_dump: Option<PathBuf>) -> io::Result<()> {
    let app = App::from_config(&config);

    let dump = debug_dump
        .map(|path| {
            info!("Dumping actions to {}", path.display());
            DebugDump::create(&path)
        })
        .transpose()?;

    let (publisher, subscription) = bridge::channel(config.bridge_capacity);
    let transport: Arc<dyn ChatTransport> = Arc::new(
        TwitchTransport::connect(&app.session, config.token.clone(), publisher)
            .map_err(io::Error::other)?,
    );

    let mut terminal = ratatui::init();
    let terminal_mode_guard = match TerminalModeGuard::new() {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!("Could not enable terminal modes: {e}");
            None
        }
    };

    // Every exit from here on goes through restore below
    let result = match or_disconnect(terminal.size(), transport.as_ref()).await {
        Ok(size) => {
            let tui = TuiState::new(&app, (size.width, size.height), config.show_timestamps);
            let mut event_loop = EventLoop::new(app, tui, subscription, transport);
            if let Some(dump) = dump {
                event_loop = event_loop.with_debug_dump(dump);
            }
            event_loop
                .run(EventStream::new(), |app, tui| {
                    terminal.draw(|f| ui::draw_ui(f, app, tui)).map(|_| ())
                })
                .await
        }
        Err(e) => Err(e),
    };

    drop(terminal_mode_guard);
    ratatui::restore();
    result
}

/// Pass a startup step through, disconnecting first if it failed. For
/// failures after connect but before the event loop owns the transport.
async fn or_disconnect<T>(step: io::Result<T>, transport: &dyn ChatTransport) -> io::Result<T> {
    if let Err(e) = &step {
        warn!("Startup failed after connecting: {e}");
        transport.disconnect().await;
    }
    step
}
