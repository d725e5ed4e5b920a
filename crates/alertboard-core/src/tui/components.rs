//! Reusable TUI components

use std::time::Duration;

use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
};

use crate::models::{Alert, AlertKind};

/// Colour associated with an alert kind
pub fn kind_color(kind: AlertKind) -> Color {
    match kind {
        AlertKind::Success => Color::Green,
        AlertKind::Error => Color::Red,
        AlertKind::Warning => Color::Yellow,
        AlertKind::Info => Color::Cyan,
    }
}

/// Coloured symbol and label for an alert kind
pub struct KindBadge {
    kind: AlertKind,
}

impl KindBadge {
    pub fn new(kind: AlertKind) -> Self {
        Self { kind }
    }

    pub fn symbol(&self) -> &'static str {
        match self.kind {
            AlertKind::Success => "✓",
            AlertKind::Error => "✗",
            AlertKind::Warning => "⚠",
            AlertKind::Info => "ℹ",
        }
    }

    pub fn to_span(&self) -> Span<'static> {
        let mut style = Style::default().fg(kind_color(self.kind));
        if self.kind == AlertKind::Error {
            style = style.add_modifier(Modifier::BOLD);
        }

        Span::styled(format!("{} {}", self.symbol(), self.kind), style)
    }
}

/// Human readable timeout for the alert table
pub fn timeout_label(alert: &Alert) -> String {
    match alert.expires_after() {
        Some(after) => humantime::format_duration(after).to_string(),
        None => "sticky".to_string(),
    }
}

/// Count of alerts per kind, in [`AlertKind::ALL`] order
pub fn kind_counts(alerts: &[Alert]) -> [(AlertKind, usize); 4] {
    AlertKind::ALL.map(|kind| (kind, alerts.iter().filter(|a| a.kind == kind).count()))
}

/// Format a tick interval for the status bar
pub fn format_interval(interval: Duration) -> String {
    humantime::format_duration(interval).to_string()
}
