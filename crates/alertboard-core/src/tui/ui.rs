//! UI rendering for the TUI

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use super::app::App;
use super::components::{format_interval, kind_color, kind_counts, timeout_label, KindBadge};

/// Main colors
const PRIMARY: Color = Color::Cyan;
const SECONDARY: Color = Color::Magenta;
const MUTED: Color = Color::DarkGray;

/// Draw the entire UI
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(5),    // Alerts
            Constraint::Length(1), // Status bar
        ])
        .split(frame.size());

    draw_header(frame, app, chunks[0]);
    draw_alerts(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);

    if app.show_help {
        draw_help_overlay(frame);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(20), Constraint::Min(40)])
        .split(area);

    let logo = Paragraph::new("🔔 Alertboard")
        .style(Style::default().fg(PRIMARY).bold())
        .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(MUTED)));
    frame.render_widget(logo, chunks[0]);

    let mut spans = vec![Span::styled(
        format!("{} active  ", app.alerts.len()),
        Style::default().bold(),
    )];
    for (kind, count) in kind_counts(&app.alerts) {
        spans.push(Span::styled(
            format!("{kind}: {count}  "),
            Style::default().fg(kind_color(kind)),
        ));
    }

    let counts = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Right)
        .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(MUTED)));
    frame.render_widget(counts, chunks[1]);
}

fn draw_alerts(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title("Alerts")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(MUTED));

    if app.alerts.is_empty() {
        let empty = Paragraph::new("No alerts. Press s/e/w/i to add one, ? for help.")
            .style(Style::default().fg(MUTED).italic())
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec!["Type", "Title", "Text", "Timeout", "Id"])
        .style(Style::default().fg(PRIMARY).bold())
        .height(1);

    let rows: Vec<Row> = app
        .alerts
        .iter()
        .map(|alert| {
            Row::new(vec![
                Cell::from(KindBadge::new(alert.kind).to_span()),
                Cell::from(truncate(&alert.title, 24)).style(Style::default().bold()),
                Cell::from(truncate(&alert.text, 48)),
                Cell::from(timeout_label(alert)).style(Style::default().fg(MUTED)),
                Cell::from(alert.id.to_string()).style(Style::default().fg(MUTED)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(11),
            Constraint::Percentage(25),
            Constraint::Percentage(45),
            Constraint::Length(10),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(block)
    .highlight_style(Style::default().bg(Color::DarkGray));

    frame.render_stateful_widget(table, area, &mut app.alerts_state.clone());
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let left_text = app
        .get_status()
        .unwrap_or("? Help | s/e/w/i Add | d Dismiss | c Clear | q Quit");
    let left = Paragraph::new(left_text).style(Style::default().fg(MUTED));
    frame.render_widget(left, chunks[0]);

    let right_text = format!(
        "Default timeout: {} | Refresh: {}",
        format_interval(app.registry.config().default_timeout()),
        format_interval(app.refresh_rate)
    );
    let right = Paragraph::new(right_text)
        .style(Style::default().fg(MUTED))
        .alignment(Alignment::Right);
    frame.render_widget(right, chunks[1]);
}

fn draw_help_overlay(frame: &mut Frame) {
    let area = centered_rect(60, 70, frame.size());

    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from("Keyboard Shortcuts").style(Style::default().fg(PRIMARY).bold()),
        Line::from(""),
        Line::from("Alerts:").style(Style::default().fg(SECONDARY)),
        Line::from("  s / e / w / i      Add success / error / warning / info"),
        Line::from("  p                  Add a persistent info alert"),
        Line::from("  d / Delete         Dismiss selected alert"),
        Line::from("  c                  Clear all alerts"),
        Line::from(""),
        Line::from("Navigation:").style(Style::default().fg(SECONDARY)),
        Line::from("  j/k or ↑/↓         Move selection"),
        Line::from("  g / G              First / last alert"),
        Line::from(""),
        Line::from("General:").style(Style::default().fg(SECONDARY)),
        Line::from("  ?                  Toggle this help"),
        Line::from("  q / Ctrl+C         Quit"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(PRIMARY)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(help, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 1).collect();
        format!("{kept}…")
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
