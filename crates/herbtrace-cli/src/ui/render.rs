//! TUI rendering functions.

use std::panic::{self, AssertUnwindSafe};

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use herbtrace_core::auth::SUPPORT_PHONE;

use crate::app::{App, Screen};

use super::pages;

/// Footer links: key, label, target.
const FOOTER_LINKS: [(char, &str, Screen); 7] = [
    ('h', "Home", Screen::Dashboard),
    ('a', "About", Screen::About),
    ('f', "Features", Screen::Features),
    ('c', "Contact", Screen::Contact),
    ('v', "QA Results", Screen::QaResults),
    ('s', "Stakeholders", Screen::Stakeholders),
    ('p', "Compliance", Screen::Compliance),
];

/// Draw the full UI, or the crash panel once the error boundary tripped.
pub fn draw(frame: &mut Frame, app: &App) {
    if let Some(ref message) = app.crash {
        draw_crash_panel(frame, message);
        return;
    }

    let footer_height = u16::from(app.screen().shows_footer());
    let contact_height = if shows_contact_bar(app) { 2 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),              // Header
            Constraint::Min(5),                 // Screen body
            Constraint::Length(footer_height),  // Footer links
            Constraint::Length(contact_height), // Contact bar
            Constraint::Length(1),              // Status bar
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    pages::draw_body(frame, app, chunks[1]);
    if footer_height > 0 {
        draw_footer(frame, app.screen(), chunks[2]);
    }
    if contact_height > 0 {
        draw_contact_bar(frame, chunks[3]);
    }
    draw_status_bar(frame, app, chunks[4]);
}

/// Support links follow a logged-in user around the role dashboards.
fn shows_contact_bar(app: &App) -> bool {
    app.state.user.is_some() && app.screen().is_role_dashboard()
}

/// Draw inside the error boundary: a panic while rendering trips the crash
/// panel instead of tearing down the terminal.
pub fn draw_with_boundary(frame: &mut Frame, app: &mut App) {
    let drawn = panic::catch_unwind(AssertUnwindSafe(|| draw(frame, app)));
    if let Err(payload) = drawn {
        let message = payload
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "rendering failed".to_string());
        app.crash(&message);
        draw_crash_panel(frame, &message);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let user = app
        .state
        .user
        .as_ref()
        .map(|u| format!(" | {} ({})", u.full_name, u.user_type))
        .unwrap_or_default();

    let busy = if app.busy { " [working...]" } else { "" };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "HerbTrace",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" | {}", app.screen().title())),
        Span::raw(user),
        Span::styled(busy, Style::default().fg(Color::Yellow)),
    ]));

    frame.render_widget(header, area);
}

fn draw_footer(frame: &mut Frame, current: Screen, area: Rect) {
    let mut spans = Vec::with_capacity(FOOTER_LINKS.len() * 2);
    for (key, label, target) in FOOTER_LINKS {
        let style = if target == current {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!("[{key}] {label}"), style));
        spans.push(Span::raw("  "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_contact_bar(frame: &mut Frame, area: Rect) {
    let label = Style::default().fg(Color::Green);
    let text = vec![
        Line::from(vec![
            Span::styled("WhatsApp ", label),
            Span::raw("wa.me/919876543210  "),
            Span::styled("Instagram ", label),
            Span::raw("instagram.com/herbtrace  "),
            Span::styled("Facebook ", label),
            Span::raw("facebook.com/herbtrace"),
        ]),
        Line::from(Span::styled(
            format!("support@herbtrace.com | {SUPPORT_PHONE} | Support hours 9 AM - 9 PM IST"),
            Style::default().fg(Color::Gray),
        )),
    ];
    frame.render_widget(Paragraph::new(text), area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let hint = if app.screen() == Screen::Dashboard {
        " | q: quit"
    } else {
        " | Esc: back | Ctrl+C: quit"
    };

    let status = Paragraph::new(Line::from(vec![
        Span::styled(&app.status, Style::default().fg(Color::DarkGray)),
        Span::styled(hint, Style::default().fg(Color::DarkGray)),
    ]));

    frame.render_widget(status, area);
}

fn draw_crash_panel(frame: &mut Frame, message: &str) {
    let area = frame.area();
    frame.render_widget(Clear, area);

    let panel_area = centered_rect(60.min(area.width), 9.min(area.height), area);
    let text = vec![
        Line::from(Span::styled(
            "Something went wrong",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("We're sorry, but something unexpected happened."),
        Line::from(Span::styled(message, Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "[R]",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Reload  "),
            Span::styled(
                "[Ctrl+C]",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Quit"),
        ]),
    ];

    let panel = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("HerbTrace")
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(panel, panel_area);
}

/// Compute a centered rectangle within the given area.
pub(super) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(area.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}
