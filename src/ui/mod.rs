// UI module for rendering the TUI.
// Lays out the search box, display controls, error region, and result table.

mod help;
pub mod table;

use std::time::Instant;

use chrono::{DateTime, Local};
use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::github::RateLimit;
use crate::state::{ResultOrigin, SearchState};

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let error_height = if app.search.error.is_some() { 1 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // Title bar
            Constraint::Length(3),            // Search input
            Constraint::Length(1),            // Display controls
            Constraint::Length(error_height), // Error region
            Constraint::Min(1),               // Results
            Constraint::Length(1),            // Status bar
        ])
        .split(frame.area());

    draw_title_bar(frame, &app.search, chunks[0]);
    draw_search_input(frame, app, chunks[1]);
    draw_controls(frame, &app.search, chunks[2]);
    if let Some(error) = &app.search.error {
        draw_error(frame, error, chunks[3]);
    }
    draw_results(frame, &mut app.search, chunks[4]);
    draw_status_bar(frame, app, chunks[5]);

    // Help overlay (rendered last, on top of everything)
    if app.show_help {
        help::draw_help_overlay(frame);
    }
}

/// Draw the title with the result count on the right.
fn draw_title_bar(frame: &mut Frame, search: &SearchState, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        " reposcout ",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title, area);

    if search.shows_table() {
        let shown = search.results.len().min(search.page_size.get());
        let count = Paragraph::new(format!(
            "{} of {} results ",
            shown,
            search.results.len()
        ))
        .alignment(Alignment::Right)
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(count, area);
    }
}

/// Draw the search box. Its title doubles as the submit button.
fn draw_search_input(frame: &mut Frame, app: &App, area: Rect) {
    let (title, border) = if app.search.loading {
        (" Loading... ", Color::Yellow)
    } else {
        (" Search ", Color::Cyan)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title);

    let mut spans = Vec::new();
    if app.search.input.is_empty() {
        spans.push(Span::styled(
            "Find a repo...",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::raw(app.search.input.as_str()));
    }
    spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));

    if let Some(remaining) = app.debouncer.remaining(Instant::now()) {
        spans.push(Span::styled(
            format!("  searching in {:.1}s", remaining.as_secs_f32()),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let input = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(input, area);
}

/// Draw the page-size and sort selectors.
fn draw_controls(frame: &mut Frame, search: &SearchState, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" Displayed rows: ", Style::default().fg(Color::DarkGray)),
        Span::styled("◀ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            search.page_size.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ▶", Style::default().fg(Color::DarkGray)),
        Span::styled("   Sort by: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            search.sort_key.title(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw the error region.
fn draw_error(frame: &mut Frame, error: &str, area: Rect) {
    let text = Paragraph::new(format!(" ❌ {}", error)).style(Style::default().fg(Color::Red));
    frame.render_widget(text, area);
}

/// Draw the result table, or a placeholder when there is nothing to show.
fn draw_results(frame: &mut Frame, search: &mut SearchState, area: Rect) {
    if !search.shows_table() {
        if search.loading {
            table::render_loading(frame, area, "Searching");
        } else if search.error.is_none() {
            let message = if search.query().is_empty() {
                "Type to search GitHub repositories"
            } else {
                "No repositories found"
            };
            table::render_empty(frame, area, message);
        }
        return;
    }

    let title = match search.origin {
        Some(ResultOrigin::Cache) => " Results (cached) ",
        _ => " Results ",
    };

    let mut table_state = search.table_state.clone();
    {
        let rows = search.displayed();
        table::render_table(frame, &rows, &mut table_state, area, title);
    }
    search.table_state = table_state;
}

/// Draw the status bar with keybinding hints and rate limit.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut hints = vec![
        Span::raw(" ↵ "),
        Span::styled("Search", Style::default().fg(Color::DarkGray)),
        Span::raw("  ←→ "),
        Span::styled("Rows", Style::default().fg(Color::DarkGray)),
        Span::raw("  Tab "),
        Span::styled("Sort", Style::default().fg(Color::DarkGray)),
        Span::raw("  ↑↓ "),
        Span::styled("Select", Style::default().fg(Color::DarkGray)),
        Span::raw("  F1 "),
        Span::styled("Help", Style::default().fg(Color::DarkGray)),
        Span::raw("  Esc "),
        Span::styled("Quit", Style::default().fg(Color::DarkGray)),
    ];

    let selected = app
        .search
        .shows_table()
        .then(|| app.search.selected_repository())
        .flatten();
    if let Some(repo) = selected {
        hints.push(Span::styled(
            format!("  {}", repo.html_url.as_deref().unwrap_or(&repo.full_name)),
            Style::default().fg(Color::Cyan),
        ));
        if let Some(description) = repo.description.as_deref().filter(|d| !d.is_empty()) {
            hints.push(Span::styled(
                format!("  {}", description),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }

    if app.in_flight > 1 {
        hints.push(Span::styled(
            format!("  {} requests in flight", app.in_flight),
            Style::default().fg(Color::Yellow),
        ));
    }

    // Add rate limit info on the right if available
    let rate = app.client.rate_limit();
    if rate.is_known() {
        let rate_color = if rate.remaining == 0 {
            Color::Red
        } else if rate.remaining < 3 {
            Color::Yellow
        } else {
            Color::DarkGray
        };
        hints.push(Span::styled(
            rate_limit_text(&rate),
            Style::default().fg(rate_color),
        ));
    }

    let status = Paragraph::new(Line::from(hints));
    frame.render_widget(status, area);
}

/// Remaining API budget, with the local reset time once it is spent.
fn rate_limit_text(rate: &RateLimit) -> String {
    let mut text = format!("  API: {}/{}", rate.remaining, rate.limit);
    if rate.remaining == 0 {
        let reset = i64::try_from(rate.reset)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0));
        if let Some(reset) = reset {
            text.push_str(&format!(
                " (resets {})",
                reset.with_timezone(&Local).format("%H:%M")
            ));
        }
    }
    text
}
