pub mod charting;
pub mod game_view;
pub mod learn_view;
pub mod modal;
pub mod profile_view;
pub mod screen;
pub mod typing_view;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Paragraph, Tabs, Widget},
};

use crate::app::{App, View};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

pub(crate) fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

pub(crate) fn dim_bold() -> Style {
    bold().add_modifier(Modifier::DIM)
}

pub(crate) fn italic() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // tabs
                Constraint::Length(1), // padding
                Constraint::Min(1),    // view
                Constraint::Length(1), // legend
            ])
            .split(area);

        let selected = View::ALL
            .iter()
            .position(|v| *v == self.view())
            .unwrap_or(0);
        Tabs::new(View::ALL.iter().map(|v| v.to_string()))
            .select(selected)
            .style(dim_bold())
            .highlight_style(bold().fg(Color::Magenta))
            .divider("|")
            .render(chunks[0], buf);

        let screen = screen::current_screen(self.view());
        screen.render(self, chunks[2], buf);

        Paragraph::new(Span::styled(screen.legend(self), italic()))
            .alignment(Alignment::Left)
            .render(chunks[3], buf);

        if let Some(result) = self.modal() {
            modal::render_modal(result, area, buf);
        }
    }
}
