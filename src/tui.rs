// Terminal ownership and the crossterm event pump feeding the app loop.
use std::{
    ops::{Deref, DerefMut},
    time::Duration,
};

use color_eyre::eyre::Result;
use futures::{FutureExt, StreamExt};
use ratatui::{
    DefaultTerminal,
    crossterm::event::{Event as CrosstermEvent, KeyEvent, KeyEventKind},
};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TuiEvent {
    Init,
    Error,
    Tick,
    Render,
    FocusGained,
    FocusLost,
    Paste(String),
    Key(KeyEvent),
    Resize(u16, u16),
}

impl TuiEvent {
    /// Key releases and repeats are dropped, as are mouse events the game has no use for.
    pub fn from_crossterm(event: CrosstermEvent) -> Option<Self> {
        match event {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Self::Key(key)),
            CrosstermEvent::Resize(width, height) => Some(Self::Resize(width, height)),
            CrosstermEvent::Paste(text) => Some(Self::Paste(text)),
            CrosstermEvent::FocusGained => Some(Self::FocusGained),
            CrosstermEvent::FocusLost => Some(Self::FocusLost),
            CrosstermEvent::Key(_) | CrosstermEvent::Mouse(_) => None,
        }
    }
}

pub struct Tui {
    terminal: DefaultTerminal,
    pump: Option<JoinHandle<()>>,
    shutdown: CancellationToken,
    events: UnboundedReceiver<TuiEvent>,
    sender: UnboundedSender<TuiEvent>,
    tick_rate: f64,
    frame_rate: f64,
    restored: bool,
}

impl Tui {
    /// Switches the terminal to raw mode on the alternate screen.
    pub fn new() -> Result<Self> {
        let terminal = ratatui::init();
        let (sender, events) = mpsc::unbounded_channel();
        Ok(Self {
            terminal,
            pump: None,
            shutdown: CancellationToken::new(),
            events,
            sender,
            tick_rate: 4.0,
            frame_rate: 30.0,
            restored: false,
        })
    }

    pub fn tick_rate(mut self, tick_rate: f64) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn frame_rate(mut self, frame_rate: f64) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    pub fn enter(&mut self) -> Result<()> {
        self.stop();
        self.shutdown = CancellationToken::new();
        self.pump = Some(tokio::spawn(pump_events(
            self.sender.clone(),
            self.shutdown.clone(),
            Duration::from_secs_f64(1.0 / self.tick_rate),
            Duration::from_secs_f64(1.0 / self.frame_rate),
        )));
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.stop();
        ratatui::restore();
        self.restored = true;
        log::info!("Terminal restored");
        Ok(())
    }

    fn stop(&mut self) {
        self.shutdown.cancel();
        if let Some(pump) = self.pump.take() {
            // The pump exits at its next select; abort covers a stuck stream read.
            pump.abort();
        }
    }

    pub async fn next(&mut self) -> Option<TuiEvent> {
        self.events.recv().await
    }
}

async fn pump_events(
    sender: UnboundedSender<TuiEvent>,
    shutdown: CancellationToken,
    tick_delay: Duration,
    render_delay: Duration,
) {
    let mut reader = crossterm::event::EventStream::new();
    let mut ticks = tokio::time::interval(tick_delay);
    let mut frames = tokio::time::interval(render_delay);
    if sender.send(TuiEvent::Init).is_err() {
        return;
    }
    loop {
        let event = tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticks.tick() => Some(TuiEvent::Tick),
            _ = frames.tick() => Some(TuiEvent::Render),
            maybe_event = reader.next().fuse() => match maybe_event {
                Some(Ok(event)) => TuiEvent::from_crossterm(event),
                Some(Err(e)) => {
                    log::warn!("Failed to read terminal event: {e}");
                    Some(TuiEvent::Error)
                }
                None => break,
            },
        };
        // A closed receiver means the app loop is gone.
        if let Some(event) = event {
            if sender.send(event).is_err() {
                break;
            }
        }
    }
}

impl Deref for Tui {
    type Target = DefaultTerminal;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for Tui {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if !self.restored {
            if let Err(e) = self.exit() {
                log::error!("Failed to restore terminal: {e:#}");
            }
        }
    }
}
