use chrono::Local;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use trashify_core::{
    appearance::{AppearanceStyle, ColorToken},
    model::QueryState,
};

use crate::app::{App, Screen};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    let center = app
        .snapshot
        .region
        .map_or_else(|| "no location yet".to_owned(), |region| region.center.to_string());
    let follow = if app.snapshot.recenter_on_device {
        "following device"
    } else {
        "pinned"
    };
    let header = Paragraph::new(format!("Map center: {center} ({follow})"))
        .block(Block::default().borders(Borders::ALL).title("Trashify"));
    frame.render_widget(header, *header_area);

    match app.screen {
        Screen::Nearby => draw_nearby(frame, app, *content_area),
        Screen::PointDetail => draw_point_detail(frame, app, *content_area),
    }

    let nav_hint = match app.screen {
        Screen::Nearby => {
            "Type lat, lon · Enter search · ↑/↓ move · Tab/→ details · ^L device · ^R follow · ^X clear · q quit"
        }
        Screen::PointDetail => "Esc/←/b back · q/Ctrl-C quit",
    };

    let (status_text, status_style) = if let Some(msg) = &app.error_message {
        (format!("{msg} · {nav_hint}"), Style::default().fg(Color::Red))
    } else {
        match &app.snapshot.state {
            QueryState::Loading => (
                format!("Loading… · {nav_hint}"),
                Style::default().fg(Color::Yellow),
            ),
            QueryState::Failed { reason, .. } => (
                format!("Search failed: {reason} · {nav_hint}"),
                Style::default().fg(Color::Red),
            ),
            QueryState::Idle | QueryState::Loaded(_) => (nav_hint.to_owned(), Style::default()),
        }
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_nearby(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // input
            Constraint::Min(0),    // results
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [input_area, results_area] = chunks else {
        return;
    };

    let input = Paragraph::new(app.coordinate_input.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Search around (latitude, longitude, Enter)"),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(input, *input_area);

    let items = if app.snapshot.annotations.is_empty() {
        vec![ListItem::new(
            "No disposal points yet. Type a coordinate and press Enter.",
        )]
    } else {
        app.snapshot
            .annotations
            .iter()
            .map(|annotation| {
                let point = &annotation.point;
                ListItem::new(format!(
                    "{} {:<14} {}",
                    icon_glyph(annotation.style.icon),
                    point.category,
                    point.location
                ))
                .style(Style::default().fg(token_color(annotation.style.color)))
            })
            .collect()
    };

    let title = match app.snapshot.updated_at {
        Some(updated) => format!(
            "Nearby disposal points ({}, updated {})",
            app.snapshot.annotations.len(),
            relative_age((Local::now() - updated).num_seconds())
        ),
        None => "Nearby disposal points".to_owned(),
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));

    let mut state = ListState::default();
    if !app.snapshot.annotations.is_empty() {
        state.select(Some(app.list_index));
    }
    frame.render_stateful_widget(list, *results_area, &mut state);
}

fn draw_point_detail(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(annotation) = app.current_annotation() else {
        let paragraph = Paragraph::new("No point selected.")
            .block(Block::default().borders(Borders::ALL).title("Point"));
        frame.render_widget(paragraph, area);
        return;
    };

    let point = &annotation.point;
    let AppearanceStyle { color, icon } = annotation.style;
    let lines = vec![
        Line::from(format!("Id:        {}", point.id.0)),
        Line::from(format!("Category:  {}", point.category)),
        Line::from(format!("Location:  {}", point.location)),
        Line::from(vec![
            Span::raw("Pin:       "),
            Span::styled(
                format!("{} {icon}", icon_glyph(icon)),
                Style::default().fg(token_color(color)),
            ),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} (Esc/←/b to go back)", point.category)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn token_color(token: ColorToken) -> Color {
    match token {
        ColorToken::Orange => Color::Rgb(255, 140, 0),
        ColorToken::Brown => Color::Rgb(150, 90, 40),
        ColorToken::Green => Color::Green,
        ColorToken::Gray => Color::Gray,
        // black pins would vanish on dark terminals
        ColorToken::Black => Color::DarkGray,
        ColorToken::Blue => Color::Blue,
        ColorToken::Yellow => Color::Yellow,
        ColorToken::Red => Color::Red,
    }
}

fn icon_glyph(icon: &str) -> &'static str {
    match icon {
        "battery" => "⚡",
        "leaf" => "❧",
        "bottle-return" => "♲",
        "box" => "■",
        "building" => "⌂",
        "document" => "≡",
        "paw" => "∴",
        "bag" => "◘",
        "printer" => "⎙",
        _ => "⚠",
    }
}

fn relative_age(seconds: i64) -> String {
    match seconds {
        ..=4 => "just now".to_owned(),
        5..=59 => format!("{seconds}s ago"),
        60..=3599 => format!("{}m ago", seconds / 60),
        _ => format!("{}h ago", seconds / 3600),
    }
}
