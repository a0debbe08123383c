// Help overlay.
// Centered popup listing the key bindings.

use ratatui::{prelude::*, widgets::*};

const BINDINGS: [(&str, &str); 9] = [
    ("  type          ", "Edit search (fires after a pause)"),
    ("  Enter         ", "Search now"),
    ("  Ctrl+U        ", "Clear search"),
    ("  ←/→           ", "Fewer / more displayed rows"),
    ("  Tab/Shift+Tab ", "Next / previous sort column"),
    ("  ↑/↓           ", "Move selection"),
    ("  F1            ", "Show/hide this help"),
    ("  Esc           ", "Close help / quit"),
    ("  Ctrl+C        ", "Quit"),
];

/// Draw the help overlay on top of the current view.
pub fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    // Create a centered popup
    let popup_width = 56;
    let popup_height = BINDINGS.len() as u16 + 6;
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(
        popup_x,
        popup_y,
        popup_width.min(area.width),
        popup_height.min(area.height),
    );

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let mut help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
    ];

    help_text.extend(BINDINGS.iter().map(|(keys, action)| {
        Line::from(vec![
            Span::styled(*keys, Style::default().fg(Color::Cyan)),
            Span::raw(*action),
        ])
    }));

    help_text.push(Line::from(""));
    help_text.push(Line::from(vec![
        Span::styled("Press ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::styled(" or ", Style::default().fg(Color::DarkGray)),
        Span::styled("F1", Style::default().fg(Color::Yellow)),
        Span::styled(" to close", Style::default().fg(Color::DarkGray)),
    ]));

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help_paragraph, popup_area);
}
