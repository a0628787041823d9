//! Per-screen body rendering.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use qrcode_generator::QrCodeEcc;
use tracing::warn;

use herbtrace_core::UserType;
use herbtrace_core::auth::SUPPORT_PHONE;

use crate::app::{App, FormField, InputField, LocationFocus, LoginFocus, Screen, ScreenData};
use crate::herb_fmt::{batch_detail_rows, truncate};

/// Draw the body of the current screen.
pub fn draw_body(frame: &mut Frame, app: &App, area: Rect) {
    let screen = app.screen();
    let lines = match screen {
        Screen::Dashboard => dashboard(),
        Screen::About => about(),
        Screen::Features => features(),
        Screen::Contact => contact(),
        Screen::QaResults => qa_results(),
        Screen::Stakeholders => stakeholders(),
        Screen::Compliance => compliance(),
        Screen::Login(user_type) => login(app, user_type),
        Screen::FarmerDashboard => farmer_dashboard(app),
        Screen::CustomerDashboard => customer_dashboard(app),
        Screen::AdminDashboard => admin_dashboard(app),
        Screen::FarmerForm => farmer_form(app),
        Screen::LocationPicker => location_picker(app),
        Screen::QrGenerated => qr_generated(app),
        Screen::QrScanner => qr_scanner(app),
        Screen::HerbDetails => herb_details(app),
    };

    let body = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(screen.title())
                .border_style(Style::default().fg(Color::Green)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(body, area);
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    ))
}

fn key_hint(key: &str, label: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("[{key}]"),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {label}")),
    ])
}

fn labeled(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<12}"), Style::default().fg(Color::Cyan)),
        Span::raw(value),
    ])
}

fn bullets(items: &[&str]) -> Vec<Line<'static>> {
    items.iter().map(|item| Line::from(format!("  - {item}"))).collect()
}

/// An input row; the focused one is highlighted and shows a cursor.
fn input_row(label: &str, field: &InputField, focused: bool, masked: bool) -> Line<'static> {
    let shown = if masked {
        "*".repeat(field.value.chars().count())
    } else {
        field.value.clone()
    };
    let (marker, style) = if focused {
        (
            "> ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ("  ", Style::default())
    };
    let cursor = if focused { "█" } else { "" };
    Line::from(vec![
        Span::styled(format!("{marker}{label:<26}"), style),
        Span::raw(shown),
        Span::styled(cursor, Style::default().fg(Color::White)),
    ])
}

fn dashboard() -> Vec<Line<'static>> {
    vec![
        heading("HerbTrace"),
        Line::from("Farm-to-shelf traceability for Ayurvedic herbs."),
        Line::from(""),
        key_hint("1", "Farmer portal: record a harvested batch"),
        key_hint("2", "Customer portal: verify a batch by its QR code"),
        key_hint("3", "Admin portal: review every recorded batch"),
    ]
}

fn about() -> Vec<Line<'static>> {
    let mut lines = vec![
        heading("About HerbTrace"),
        Line::from(
            "HerbTrace follows each batch of medicinal herbs from the collection site to the customer.",
        ),
        Line::from(""),
        heading("Our Core Values"),
    ];
    lines.extend(bullets(&[
        "Trust & Transparency: complete transparency in the verification process",
        "Sustainability: sustainable farming and environmental responsibility",
        "Innovation: continuously improving herb quality and traceability",
    ]));
    lines
}

fn features() -> Vec<Line<'static>> {
    let mut lines = vec![heading("Features")];
    lines.extend(bullets(&[
        "Geo-tagged collection records with harvest date and quantity",
        "A unique batch id and QR code for every batch",
        "Processing and lab testing history attached to the batch",
        "Instant verification for customers",
        "A single view of all batches for administrators",
    ]));
    lines
}

fn contact() -> Vec<Line<'static>> {
    vec![
        heading("Contact Us"),
        labeled("Phone", SUPPORT_PHONE.to_string()),
        labeled("Email", "support@herbtrace.com".to_string()),
        labeled("Hours", "Mon-Sat, 9:00-18:00 IST".to_string()),
    ]
}

fn qa_results() -> Vec<Line<'static>> {
    let mut lines = vec![heading("Quality Assurance")];
    lines.extend(bullets(&[
        "Moisture content and foreign matter checks",
        "Heavy metal and pesticide residue screening",
        "Microbial load testing",
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from("Test results appear on each batch's detail page."));
    lines
}

fn stakeholders() -> Vec<Line<'static>> {
    let mut lines = vec![heading("Stakeholders")];
    lines.extend(bullets(&[
        "Farmers and wild collectors",
        "Processors and testing laboratories",
        "Manufacturers and retailers",
        "Customers",
    ]));
    lines
}

fn compliance() -> Vec<Line<'static>> {
    let mut lines = vec![heading("Compliance")];
    lines.extend(bullets(&[
        "Good Agricultural and Collection Practices (GACP)",
        "National Medicinal Plants Board guidelines",
        "Organic certification where declared",
    ]));
    lines
}

fn login(app: &App, user_type: UserType) -> Vec<Line<'static>> {
    let form = &app.login;
    vec![
        heading(&format!("Sign in to the {user_type} portal")),
        Line::from(""),
        input_row("Email", &form.email, form.focus == LoginFocus::Email, false),
        input_row(
            "Password",
            &form.password,
            form.focus == LoginFocus::Password,
            true,
        ),
        Line::from(""),
        Line::from("Tab: switch field | Enter: sign in"),
    ]
}

fn welcome(app: &App) -> Line<'static> {
    let name = app
        .state
        .user
        .as_ref()
        .map_or("guest", |u| u.full_name.as_str());
    heading(&format!("Welcome, {name}"))
}

fn record_rows(app: &App, with_farmer: bool) -> Vec<Line<'static>> {
    let records = app.listing();
    if records.is_empty() {
        let text = if app.busy { "Loading..." } else { "No batches yet." };
        return vec![Line::from(text)];
    }
    let mut lines = vec![Line::from(Span::styled(
        format!(
            "  {:<20} {:<16} {:>8} {:<11} {:<10}{}",
            "BATCH",
            "HERB",
            "QTY",
            "HARVESTED",
            "GRADE",
            if with_farmer { " FARMER" } else { "" }
        ),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for (i, r) in records.iter().enumerate() {
        let farmer = if with_farmer {
            format!(" {}", truncate(&r.farmer_name, 16))
        } else {
            String::new()
        };
        let text = format!(
            "{} {:<20} {:<16} {:>8} {:<11} {:<10}{farmer}",
            if i == app.selected { ">" } else { " " },
            r.batch_id,
            truncate(&r.herb_name, 16),
            r.quantity,
            r.harvest_date,
            truncate(&r.quality_grade, 10),
        );
        let style = if i == app.selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(text, style)));
    }
    lines
}

fn farmer_dashboard(app: &App) -> Vec<Line<'static>> {
    let mut lines = vec![welcome(app), heading("My Collections")];
    lines.extend(record_rows(app, false));
    lines.push(Line::from(""));
    lines.push(key_hint("n", "New collection"));
    lines.push(key_hint("Enter", "Show QR code"));
    lines.push(key_hint("r", "Refresh"));
    lines.push(key_hint("l", "Log out"));
    lines
}

fn customer_dashboard(app: &App) -> Vec<Line<'static>> {
    vec![
        welcome(app),
        Line::from("Verify the origin of your herbs before you buy."),
        Line::from(""),
        key_hint("s", "Scan a batch QR code"),
        key_hint("l", "Log out"),
    ]
}

fn admin_dashboard(app: &App) -> Vec<Line<'static>> {
    let total_kg: f64 = app.batches.iter().map(|r| r.quantity).sum();
    let organic = app.batches.iter().filter(|r| r.organic_certified).count();
    let mut lines = vec![
        welcome(app),
        Line::from(format!(
            "{} batch(es) | {total_kg} kg total | {organic} organic",
            app.batches.len()
        )),
        Line::from(""),
    ];
    lines.extend(record_rows(app, true));
    lines.push(Line::from(""));
    lines.push(key_hint("r", "Refresh"));
    lines.push(key_hint("l", "Log out"));
    lines
}

fn farmer_form(app: &App) -> Vec<Line<'static>> {
    let form = &app.farmer_form;
    let mut lines = vec![heading("Record a new collection"), Line::from("")];
    for field in FormField::ORDER {
        let focused = form.focus == field;
        let line = match field {
            FormField::Location => {
                let value = app.state.picked_location().map_or_else(
                    || "(none, press Enter to pick)".to_string(),
                    ToString::to_string,
                );
                input_row(field.label(), &InputField::with_value(&value), focused, false)
            }
            FormField::Organic => {
                let mark = if form.organic { "[x]" } else { "[ ]" };
                input_row(field.label(), &InputField::with_value(mark), focused, false)
            }
            FormField::Submit => {
                let style = if focused {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Green)
                };
                Line::from(Span::styled("  [ Submit collection ]", style))
            }
            text_field => match form.text(text_field) {
                Some(input) => input_row(field.label(), input, focused, false),
                None => Line::from(""),
            },
        };
        lines.push(line);
    }
    lines.push(Line::from(""));
    lines.push(Line::from(
        "Tab/Up/Down: move | Space: toggle organic | Enter: pick location / submit",
    ));
    lines
}

fn location_picker(app: &App) -> Vec<Line<'static>> {
    let loc = &app.location;
    vec![
        heading("Collection site"),
        Line::from(""),
        input_row(
            "Latitude",
            &loc.latitude,
            loc.focus == LocationFocus::Latitude,
            false,
        ),
        input_row(
            "Longitude",
            &loc.longitude,
            loc.focus == LocationFocus::Longitude,
            false,
        ),
        input_row(
            "Address (optional)",
            &loc.address,
            loc.focus == LocationFocus::Address,
            false,
        ),
        Line::from(""),
        Line::from("Tab: next field | Enter: use this location | Esc: cancel"),
    ]
}

fn qr_generated(app: &App) -> Vec<Line<'static>> {
    let batch_id = match &app.state.data {
        ScreenData::Batch { batch_id } => batch_id.clone(),
        _ => String::new(),
    };
    let mut lines = vec![heading("Batch recorded"), Line::from("")];
    lines.extend(qr_lines(&batch_id));
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            batch_id,
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(
        "Label the batch with this code; customers scan it or enter the id to verify the herbs.",
    ));
    lines.push(Line::from(""));
    lines.push(key_hint("Enter", "Back to my collections"));
    lines
}

/// Quiet zone around the symbol, in modules.
const QR_MARGIN: usize = 2;

/// Render `text` as a QR code, two module rows per terminal line. Light
/// modules are block glyphs on a black background.
fn qr_lines(text: &str) -> Vec<Line<'static>> {
    if text.is_empty() {
        return Vec::new();
    }
    let matrix = match qrcode_generator::to_matrix(text, QrCodeEcc::Medium) {
        Ok(matrix) => matrix,
        Err(e) => {
            warn!(error = ?e, "Failed to encode QR code");
            return Vec::new();
        }
    };

    let size = matrix.len() + QR_MARGIN * 2;
    let light = |row: usize, col: usize| {
        let (Some(r), Some(c)) = (row.checked_sub(QR_MARGIN), col.checked_sub(QR_MARGIN)) else {
            return true;
        };
        !matrix
            .get(r)
            .and_then(|cells| cells.get(c))
            .copied()
            .unwrap_or(false)
    };
    let style = Style::default().fg(Color::White).bg(Color::Black);

    (0..size)
        .step_by(2)
        .map(|row| {
            let glyphs: String = (0..size)
                .map(|col| match (light(row, col), light(row + 1, col)) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                })
                .collect();
            Line::from(vec![Span::raw("  "), Span::styled(glyphs, style)])
        })
        .collect()
}

fn qr_scanner(app: &App) -> Vec<Line<'static>> {
    vec![
        heading("Verify a batch"),
        Line::from(""),
        input_row("Batch id", &app.scanner, true, false),
        Line::from(""),
        Line::from("Type the id printed under the QR code, then press Enter."),
    ]
}

fn herb_details(app: &App) -> Vec<Line<'static>> {
    let ScreenData::Herb(ref herb) = app.state.data else {
        return vec![Line::from("No batch selected.")];
    };
    let mut lines = vec![
        heading(&format!("{} (verified)", herb.herb_name)),
        Line::from(""),
    ];
    lines.extend(
        batch_detail_rows(herb)
            .into_iter()
            .map(|(label, value)| labeled(label, value)),
    );
    lines.push(Line::from(""));
    lines.push(key_hint("Enter", "Verify another batch"));
    lines
}
