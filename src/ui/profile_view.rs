use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

use crate::app::App;
use crate::history::{format_timestamp, graph_points, humanize_age, newest_first, summarize};
use crate::session::{Score, SessionRecord};
use crate::ui::{bold, charting, dim_bold, italic};

/// Pure presenter for a single history row
pub fn present_row(record: &SessionRecord, now: &DateTime<Local>) -> Row<'static> {
    let wpm_color = if record.wpm >= 60 {
        Color::Green
    } else if record.wpm >= 30 {
        Color::Yellow
    } else {
        Color::Red
    };

    let score = match record.score {
        Score::Accuracy(acc) => format!("{acc}%"),
        Score::Points(points) => format!("{points} pts"),
    };

    Row::new(vec![
        Cell::from(format_timestamp(&record.timestamp)),
        Cell::from(record.kind.to_string()).style(bold()),
        Cell::from(record.wpm.to_string()).style(Style::default().fg(wpm_color)),
        Cell::from(score),
        Cell::from(humanize_age(&record.timestamp, now)).style(italic()),
    ])
}

pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    let [summary_area, chart_area, table_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Percentage(45),
        Constraint::Min(3),
    ])
    .areas(area);

    let records = app.history();

    let summary = match summarize(records) {
        None if app.store().is_none() => "history unavailable".to_string(),
        Some(s) => format!(
            "{} sessions   best {} wpm   avg {:.1} wpm   {:.2} sd",
            s.sessions, s.best_wpm, s.average_wpm, s.wpm_std_dev
        ),
        None => "no sessions yet".to_string(),
    };
    Paragraph::new(Span::styled(summary, bold()))
        .alignment(Alignment::Center)
        .render(summary_area, buf);

    match graph_points(records) {
        Some((points, max_wpm)) => {
            charting::history_chart(&points, max_wpm).render(chart_area, buf);
        }
        None => {
            Paragraph::new(Span::styled(
                "Insufficient data to generate graph",
                dim_bold(),
            ))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
            .render(chart_area, buf);
        }
    }

    let now = DateTime::<Local>::from(app.now());
    let rows: Vec<Row> = newest_first(records)
        .into_iter()
        .skip(app.history_scroll())
        .map(|record| present_row(record, &now))
        .collect();

    let header = Row::new(vec!["Date", "Mode", "WPM", "Score", "When"]).style(bold());
    Table::new(
        rows,
        [
            Constraint::Length(20),
            Constraint::Length(14),
            Constraint::Length(5),
            Constraint::Length(9),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::TOP).title(" History "))
    .render(table_area, buf);
}
