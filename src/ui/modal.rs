use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::Color,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::app::ResultModal;
use crate::ui::{bold, italic};

const MODAL_WIDTH: u16 = 36;

pub fn modal_lines(result: &ResultModal) -> Vec<Line<'static>> {
    let accuracy = match result.accuracy {
        Some(acc) => format!("{acc}%"),
        None => "---".to_string(),
    };

    let mut lines = vec![
        Line::from(Span::styled(format!("WPM: {}", result.wpm), bold())),
        Line::from(Span::styled(format!("Accuracy: {accuracy}"), bold())),
        Line::from(result.extra.clone()),
    ];
    if result.new_high_score {
        lines.push(Line::from(Span::styled(
            "New High Score!",
            bold().fg(Color::Yellow),
        )));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("(enter) close", italic())));
    lines
}

/// Centered box drawn over whatever view is below
pub fn render_modal(result: &ResultModal, area: Rect, buf: &mut Buffer) {
    let lines = modal_lines(result);
    let height = lines.len() as u16 + 2;

    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(MODAL_WIDTH)])
        .flex(Flex::Center)
        .areas(row);

    Clear.render(rect, buf);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(bold().fg(Color::Magenta))
                .title(Line::from(format!(" {} ", result.title)).centered()),
        )
        .render(rect, buf);
}
