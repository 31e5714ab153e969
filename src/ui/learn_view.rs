use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

use crate::app::App;
use crate::content::Lesson;
use crate::ui::{bold, dim_bold, italic};

/// One keycap per preview slot, blanks for unused slots
pub fn key_preview(lesson: &Lesson) -> Line<'static> {
    let spans = lesson
        .preview()
        .into_iter()
        .map(|key| match key {
            Some(c) => Span::styled(format!("[{c}]"), bold().fg(Color::Magenta)),
            None => Span::styled("[ ]", dim_bold()),
        })
        .flat_map(|cap| [cap, Span::raw(" ")])
        .collect::<Vec<Span>>();
    Line::from(spans)
}

pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    let [list_area, preview_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(4)]).areas(area);

    let items: Vec<ListItem> = app
        .lessons()
        .iter()
        .map(|lesson| {
            ListItem::new(vec![
                Line::from(Span::styled(lesson.title.clone(), bold())),
                Line::from(Span::styled(format!("  {}", lesson.desc), italic())),
            ])
        })
        .collect();

    let mut state = ListState::default().with_selected(Some(app.selected_lesson()));
    StatefulWidget::render(
        List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" Lessons "))
            .highlight_style(Style::default().fg(Color::Cyan))
            .highlight_symbol("> "),
        list_area,
        buf,
        &mut state,
    );

    if let Some(lesson) = app.lessons().get(app.selected_lesson()) {
        Paragraph::new(vec![
            Line::from(Span::styled(format!("keys: {}", lesson.keys), dim_bold())),
            key_preview(lesson),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP))
        .render(preview_area, buf);
    }
}
