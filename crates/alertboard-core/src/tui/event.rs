//! Event handling for the TUI

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

use crate::registry::AlertEvent;

/// Shortest tick interval the terminal poller accepts, in milliseconds
pub const MIN_TICK_RATE_MS: u64 = 10;

/// TUI events
#[derive(Debug, Clone)]
pub enum Event {
    /// Terminal tick (for animations/updates)
    Tick,
    /// Keyboard event
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// The alert registry changed
    Alert(AlertEvent),
    /// Alert notifications were missed; the list must be re-read
    Resync,
}

/// Handles events from terminal and the alert registry
pub struct EventHandler {
    /// Sender for events
    tx: mpsc::UnboundedSender<Event>,
    /// Receiver for events
    rx: mpsc::UnboundedReceiver<Event>,
    /// Tick rate
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a new event handler
    ///
    /// Tick rates below [`MIN_TICK_RATE_MS`] are raised to it.
    pub fn new(tick_rate_ms: u64) -> Self {
        if tick_rate_ms < MIN_TICK_RATE_MS {
            warn!(
                requested = tick_rate_ms,
                applied = MIN_TICK_RATE_MS,
                "Tick rate too low, clamping"
            );
        }

        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            tick_rate: Duration::from_millis(tick_rate_ms.max(MIN_TICK_RATE_MS)),
        }
    }

    /// Interval between tick events
    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Start polling the terminal
    pub fn start(&self) {
        let tick_rate = self.tick_rate;
        let tx = self.tx.clone();

        tokio::task::spawn_blocking(move || {
            let mut last_tick = std::time::Instant::now();

            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);

                if event::poll(timeout).unwrap_or(false) {
                    let forwarded = match event::read() {
                        Ok(CrosstermEvent::Key(key)) => tx.send(Event::Key(key)),
                        Ok(CrosstermEvent::Resize(w, h)) => tx.send(Event::Resize(w, h)),
                        _ => Ok(()),
                    };
                    if forwarded.is_err() {
                        break;
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    if tx.send(Event::Tick).is_err() {
                        break;
                    }
                    last_tick = std::time::Instant::now();
                }
            }
        });
    }

    /// Forward registry notifications into the event stream
    pub fn forward_alerts(&self, mut alerts: broadcast::Receiver<AlertEvent>) {
        let tx = self.tx.clone();

        tokio::spawn(async move {
            loop {
                let event = match alerts.recv().await {
                    Ok(event) => Event::Alert(event),
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(missed, "Alert subscriber lagged");
                        Event::Resync
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
            debug!("Alert forwarding stopped");
        });
    }

    /// Get the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Check if a key event matches a key binding
pub fn key_match(key: KeyEvent, code: KeyCode, modifiers: KeyModifiers) -> bool {
    key.code == code && key.modifiers == modifiers
}

/// Check if key is quit command (q or Ctrl+C)
pub fn is_quit(key: KeyEvent) -> bool {
    key_match(key, KeyCode::Char('q'), KeyModifiers::NONE)
        || key_match(key, KeyCode::Char('c'), KeyModifiers::CONTROL)
}
