use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::{Publication, PublicationKind};

/// Short tag shown in front of each publication row.
pub(crate) fn kind_badge(publication: &Publication) -> Span<'static> {
    match publication.kind() {
        PublicationKind::Book { .. } => Span::styled("[BOOK]", Style::default().fg(Color::Cyan)),
        PublicationKind::Magazine {
            is_latest: true, ..
        } => Span::styled("[MAG*]", Style::default().fg(Color::Magenta)),
        PublicationKind::Magazine { .. } => {
            Span::styled("[MAG ]", Style::default().fg(Color::Magenta))
        }
    }
}

/// Two-line list entry: title with badge, then type details and loan state.
pub(crate) fn publication_lines(publication: &Publication, selected: bool) -> Vec<Line<'static>> {
    let title_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let details = match publication.kind() {
        PublicationKind::Book {
            author,
            isbn,
            category,
        } => format!("{author} | {category} | ISBN {isbn}"),
        PublicationKind::Magazine {
            issue,
            publisher,
            is_latest,
        } => {
            let status = if *is_latest { "latest issue" } else { "archived" };
            format!("issue {issue} | {publisher} | {status}")
        }
    };

    let state = match publication.loan() {
        Some(loan) => Span::styled(
            format!(
                "  on loan to {} until {}",
                loan.borrower_name,
                loan.due.format("%Y-%m-%d")
            ),
            Style::default().fg(Color::Red),
        ),
        None => Span::styled(
            format!("  available, {} day loan", publication.max_loan_days()),
            Style::default().fg(Color::Green),
        ),
    };

    vec![
        Line::from(vec![
            kind_badge(publication),
            Span::raw(" "),
            Span::styled(publication.title().to_string(), title_style),
        ]),
        Line::from(vec![
            Span::styled(format!("       {details}"), Style::default().fg(Color::Gray)),
            state,
        ]),
    ]
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}
