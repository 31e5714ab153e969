use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::session::Phase;
use crate::typing::CharState;
use crate::ui::{bold, dim_bold, italic};

fn style_for(state: CharState) -> Style {
    match state {
        CharState::Correct => bold().fg(Color::Green),
        CharState::Incorrect => bold().fg(Color::Red),
        CharState::Current => dim_bold().add_modifier(Modifier::UNDERLINED),
        CharState::Pending => dim_bold(),
    }
}

/// Target text split into runs of equal state
pub fn prompt_spans(target: &str, states: &[CharState]) -> Vec<Span<'static>> {
    target
        .chars()
        .zip(states.iter().copied())
        .chunk_by(|(_, state)| *state)
        .into_iter()
        .map(|(state, run)| {
            let text: String = run
                .map(|(c, _)| match (state, c) {
                    (CharState::Incorrect, ' ') => '·',
                    (_, c) => c,
                })
                .collect();
            Span::styled(text, style_for(state))
        })
        .collect()
}

pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    let attempt = app.attempt();
    let metrics = attempt.metrics(app.now());

    let [settings_area, stats_area, _, prompt_area, hint_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let settings = match app.practice_lesson() {
        Some(lesson) => format!("Practice: {}  [{}]", lesson.title, lesson.keys),
        None => format!(
            "{}s   {}",
            app.config().test_duration_secs,
            app.config().test_difficulty
        ),
    };
    Paragraph::new(Span::styled(settings, Style::default().fg(Color::Cyan)))
        .alignment(Alignment::Center)
        .render(settings_area, buf);

    let stats = format!(
        "{}s   {} wpm   {}% acc   {} errors",
        metrics.seconds_remaining, metrics.wpm, metrics.accuracy, metrics.mismatches
    );
    Paragraph::new(Span::styled(stats, bold()))
        .alignment(Alignment::Center)
        .render(stats_area, buf);

    let max_chars_per_line = prompt_area.width.max(1) as usize;
    let fits_one_line = attempt.target().width() <= max_chars_per_line;
    let cursor_line = (attempt.typed().width() / max_chars_per_line) as u16;

    Paragraph::new(Line::from(prompt_spans(
        attempt.target(),
        &attempt.char_states(),
    )))
    .alignment(if fits_one_line {
        Alignment::Center
    } else {
        Alignment::Left
    })
    .wrap(Wrap { trim: true })
    .scroll((cursor_line.saturating_sub(1), 0))
    .render(prompt_area, buf);

    let hint = match attempt.phase() {
        Phase::Idle => "start typing to begin",
        Phase::Active => "",
        Phase::Finished => "(enter) continue",
    };
    Paragraph::new(Span::styled(hint, italic().fg(Color::Yellow)))
        .alignment(Alignment::Center)
        .render(hint_area, buf);
}
