// Result table rendering.
// Turns the displayed repositories into rows; never sorts or slices them itself.

use ratatui::{prelude::*, widgets::*};

use crate::github::Repository;

/// Column headers, in display order.
pub const HEADERS: [&str; 4] = ["Name", "Owner", "Stars", "Created at"];

/// Date portion of an ISO-8601 timestamp.
pub fn created_date(created_at: &str) -> &str {
    created_at.get(..10).unwrap_or(created_at)
}

/// The four displayed fields of a repository.
pub fn row_cells(repo: &Repository) -> [String; 4] {
    [
        repo.name.clone(),
        repo.owner.login.clone(),
        repo.stargazers_count.to_string(),
        created_date(&repo.created_at).to_string(),
    ]
}

/// Render a loading indicator.
pub fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(format!("⏳ {}...", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, area);
}

/// Render the result table, one row per repository in the given order.
pub fn render_table(
    frame: &mut Frame,
    repos: &[&Repository],
    table_state: &mut TableState,
    area: Rect,
    title: &str,
) {
    let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h))).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = repos
        .iter()
        .map(|repo| {
            let [name, owner, stars, created] = row_cells(repo);
            Row::new(vec![
                Cell::from(name).style(Style::default().fg(Color::White)),
                Cell::from(owner),
                Cell::from(Text::from(stars).alignment(Alignment::Right))
                    .style(Style::default().fg(Color::Yellow)),
                Cell::from(created).style(Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(35),
        Constraint::Percentage(30),
        Constraint::Length(10),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(table, area, table_state);
}

/// Render the table as aligned plain text for non-interactive output.
pub fn render_plain(repos: &[&Repository]) -> String {
    let rows: Vec<[String; 4]> = repos.iter().map(|repo| row_cells(repo)).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_row = |cells: [&str; 4]| {
        let line = format!(
            "{:<w0$}  {:<w1$}  {:>w2$}  {:<w3$}",
            cells[0],
            cells[1],
            cells[2],
            cells[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
        );
        out.push_str(line.trim_end());
        out.push('\n');
    };

    push_row(HEADERS);
    for row in &rows {
        push_row([row[0].as_str(), row[1].as_str(), row[2].as_str(), row[3].as_str()]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::Owner;
    use ratatui::backend::TestBackend;

    fn repo(name: &str, owner: &str, stars: u64, created_at: &str) -> Repository {
        Repository {
            name: name.to_string(),
            full_name: format!("{}/{}", owner, name),
            owner: Owner {
                login: owner.to_string(),
            },
            stargazers_count: stars,
            created_at: created_at.to_string(),
            description: None,
            html_url: None,
        }
    }

    #[test]
    fn test_created_date_truncation() {
        assert_eq!(created_date("2013-05-24T16:15:54Z"), "2013-05-24");
        assert_eq!(created_date("2013"), "2013");
        assert_eq!(created_date(""), "");
    }

    #[test]
    fn test_row_cells() {
        let r = repo("react", "facebook", 230000, "2013-05-24T16:15:54Z");
        assert_eq!(
            row_cells(&r),
            [
                "react".to_string(),
                "facebook".to_string(),
                "230000".to_string(),
                "2013-05-24".to_string()
            ]
        );
    }

    #[test]
    fn test_render_plain_keeps_given_order() {
        let a = repo("zeta", "one", 1, "2020-01-01T00:00:00Z");
        let b = repo("alpha", "two", 500, "2021-02-02T00:00:00Z");
        let out = render_plain(&[&a, &b]);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Name"));
        assert!(lines[1].starts_with("zeta"));
        assert!(lines[2].starts_with("alpha"));
        assert!(lines[2].contains("2021-02-02"));
        assert!(!lines[2].contains("T00:00:00Z"));
    }

    #[test]
    fn test_render_table_draws_one_row_per_repository() {
        let a = repo("react", "facebook", 230000, "2013-05-24T16:15:54Z");
        let b = repo("vue", "vuejs", 207000, "2013-07-29T03:24:51Z");

        let mut terminal = Terminal::new(TestBackend::new(80, 8)).unwrap();
        let mut state = TableState::default();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_table(frame, &[&a, &b], &mut state, area, " Results ");
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n");

        assert!(text.contains("Created at"));
        assert!(text.contains("facebook"));
        assert!(text.contains("2013-07-29"));
        assert!(!text.contains("16:15:54"));
    }
}
