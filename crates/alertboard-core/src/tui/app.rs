//! Main TUI application state and logic

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::TableState;
use tracing::debug;

use super::event::{is_quit, Event, EventHandler, MIN_TICK_RATE_MS};
use crate::models::{Alert, AlertKind};
use crate::registry::{AlertEvent, AlertRegistry, RemovalReason};

/// Sample messages used by the add-alert shortcuts
fn sample(kind: AlertKind) -> (&'static str, &'static str) {
    match kind {
        AlertKind::Success => ("Saved", "Changes written to disk"),
        AlertKind::Error => ("Request failed", "Server responded with 503"),
        AlertKind::Warning => ("Low disk space", "Less than 1 GiB remaining"),
        AlertKind::Info => ("Update available", "Version 1.2.0 can be installed"),
    }
}

/// Main TUI application state
pub struct App {
    /// Whether the app should quit
    pub should_quit: bool,
    /// Registry the dashboard renders and mutates
    pub registry: AlertRegistry,
    /// Last snapshot of the registry
    pub alerts: Vec<Alert>,
    /// Alerts table state
    pub alerts_state: TableState,
    /// Last update time
    pub last_update: Instant,
    /// Refresh rate
    pub refresh_rate: Duration,
    /// Show help overlay
    pub show_help: bool,
    /// Status message
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new TUI app over a registry
    pub fn new(registry: AlertRegistry) -> Self {
        let mut app = Self {
            should_quit: false,
            registry,
            alerts: Vec::new(),
            alerts_state: TableState::default(),
            last_update: Instant::now(),
            refresh_rate: Duration::from_millis(250),
            show_help: false,
            status_message: None,
        };
        app.sync();
        app
    }

    /// Set refresh rate
    pub fn with_refresh_rate(mut self, ms: u64) -> Self {
        self.refresh_rate = Duration::from_millis(ms.max(MIN_TICK_RATE_MS));
        self
    }

    /// Re-read the registry and keep the selection in range
    pub fn sync(&mut self) {
        self.alerts = self.registry.alerts();
        self.last_update = Instant::now();

        let len = self.alerts.len();
        match self.alerts_state.selected() {
            _ if len == 0 => self.alerts_state.select(None),
            Some(i) if i >= len => self.alerts_state.select(Some(len - 1)),
            None => self.alerts_state.select(Some(0)),
            Some(_) => {}
        }
    }

    /// Apply an event from the [`EventHandler`]
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Alert(alert_event) => {
                if let AlertEvent::Removed {
                    id,
                    reason: RemovalReason::Expired,
                } = &alert_event
                {
                    debug!(alert_id = %id, "Alert expired while displayed");
                }
                self.sync();
            }
            Event::Resync => self.sync(),
            Event::Tick | Event::Resize(_, _) => {}
        }
    }

    /// Handle key events
    pub fn handle_key(&mut self, key: KeyEvent) {
        if is_quit(key) {
            self.should_quit = true;
            return;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char('?'), KeyModifiers::NONE) => {
                self.show_help = !self.show_help;
            }
            (KeyCode::Esc, KeyModifiers::NONE) => {
                self.show_help = false;
            }
            (KeyCode::Char('s'), KeyModifiers::NONE) => self.add_sample(AlertKind::Success, None),
            (KeyCode::Char('e'), KeyModifiers::NONE) => self.add_sample(AlertKind::Error, None),
            (KeyCode::Char('w'), KeyModifiers::NONE) => self.add_sample(AlertKind::Warning, None),
            (KeyCode::Char('i'), KeyModifiers::NONE) => self.add_sample(AlertKind::Info, None),
            (KeyCode::Char('p'), KeyModifiers::NONE) => {
                self.add_sample(AlertKind::Info, Some(Duration::ZERO));
            }
            (KeyCode::Char('d') | KeyCode::Delete, _) => self.dismiss_selected(),
            (KeyCode::Char('c'), KeyModifiers::NONE) => {
                self.registry.clear();
                self.set_status("Cleared all alerts".to_string());
                self.sync();
            }
            (code, _) => self.handle_navigation(code),
        }
    }

    fn handle_navigation(&mut self, code: KeyCode) {
        let len = self.alerts.len();
        if len == 0 {
            return;
        }

        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                let i = self.alerts_state.selected().unwrap_or(0);
                self.alerts_state.select(Some(i.saturating_sub(1)));
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let i = self.alerts_state.selected().unwrap_or(0);
                self.alerts_state.select(Some((i + 1).min(len - 1)));
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.alerts_state.select(Some(0));
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.alerts_state.select(Some(len - 1));
            }
            _ => {}
        }
    }

    fn add_sample(&mut self, kind: AlertKind, timeout: Option<Duration>) {
        let (title, text) = sample(kind);
        let id = self.registry.add(kind, title, text, timeout);
        self.set_status(format!("Added {id}"));
        self.sync();
    }

    fn dismiss_selected(&mut self) {
        let Some(alert) = self
            .alerts_state
            .selected()
            .and_then(|i| self.alerts.get(i))
        else {
            return;
        };

        let id = alert.id.clone();
        if self.registry.remove(&id) {
            self.set_status(format!("Dismissed {id}"));
        }
        self.sync();
    }

    /// The alert under the cursor
    pub fn selected(&self) -> Option<&Alert> {
        self.alerts_state.selected().and_then(|i| self.alerts.get(i))
    }

    /// Set a status message that expires after 3 seconds
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get current status message if not expired
    pub fn get_status(&self) -> Option<&str> {
        self.status_message.as_ref().and_then(|(msg, time)| {
            if time.elapsed() < Duration::from_secs(3) {
                Some(msg.as_str())
            } else {
                None
            }
        })
    }

    /// Run the TUI application
    pub async fn run(&mut self) -> crate::error::Result<()> {
        use crate::error::Error;
        use crossterm::{
            execute,
            terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        };
        use ratatui::{backend::CrosstermBackend, Terminal};
        use std::io;

        // Setup terminal
        enable_raw_mode().map_err(Error::tui)?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(Error::tui)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(Error::tui)?;

        let mut events = EventHandler::new(self.refresh_rate.as_millis() as u64);
        events.forward_alerts(self.registry.subscribe());
        events.start();
        self.sync();

        // Main loop
        let mut result = Ok(());
        while !self.should_quit {
            if let Err(e) = terminal.draw(|frame| super::ui::draw(frame, self)) {
                result = Err(Error::tui(e));
                break;
            }

            match events.next().await {
                Some(event) => self.handle_event(event),
                None => break,
            }
        }

        // Restore terminal
        disable_raw_mode().map_err(Error::tui)?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen).map_err(Error::tui)?;
        terminal.show_cursor().map_err(Error::tui)?;

        result
    }
}
