use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::app::App;
use crate::game::{Target, ARENA_WIDTH, BOTTOM_BOUNDARY, START_LIVES};
use crate::session::Phase;
use crate::ui::{bold, dim_bold, italic};

/// Screen cell for a target inside the arena, `None` while above the top edge
pub fn arena_cell(target: &Target, arena: Rect) -> Option<(u16, u16)> {
    if target.y < 0.0 || arena.width == 0 || arena.height == 0 {
        return None;
    }

    let col = (target.x / ARENA_WIDTH * arena.width as f64) as u16;
    let row = (target.y / BOTTOM_BOUNDARY * (arena.height - 1) as f64) as u16;

    Some((
        arena.x + col.min(arena.width - 1),
        arena.y + row.min(arena.height - 1),
    ))
}

fn lives_display(lives: u32) -> String {
    let lost = START_LIVES.saturating_sub(lives) as usize;
    format!("{}{}", "♥".repeat(lives as usize), "♡".repeat(lost))
}

pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    let [status_area, arena_area, input_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(area);

    let snapshot = app.game().map(|round| round.snapshot(app.now()));

    let status = match snapshot {
        Some(snap) => format!(
            "Score: {}   Lives: {}   WPM: {}   Best: {}   {}",
            snap.score,
            lives_display(snap.lives),
            snap.wpm,
            app.high_score(),
            snap.difficulty
        ),
        None => format!(
            "Best: {}   {}",
            app.high_score(),
            app.config().game_difficulty
        ),
    };
    Paragraph::new(Span::styled(status, bold()))
        .alignment(Alignment::Center)
        .render(status_area, buf);

    let block = Block::default().borders(Borders::ALL);
    let arena = block.inner(arena_area);
    block.render(arena_area, buf);

    match (app.game(), snapshot.map(|s| s.phase)) {
        (Some(round), Some(Phase::Active)) => {
            let word_style = bold().fg(Color::Yellow);
            for target in round.targets() {
                if let Some((x, y)) = arena_cell(target, arena) {
                    let room = (arena.right() - x) as usize;
                    buf.set_stringn(x, y, &target.word, room, word_style);
                }
            }
        }
        (_, phase) => {
            let mut lines = Vec::new();
            if phase == Some(Phase::Finished) {
                lines.push(Line::from(Span::styled(
                    format!("Game Over - score {}", snapshot.map(|s| s.score).unwrap_or(0)),
                    bold().fg(Color::Red),
                )));
            }
            lines.push(Line::from(Span::styled(
                "press enter to start",
                italic().fg(Color::Yellow),
            )));
            let top = arena.height.saturating_sub(lines.len() as u16) / 2;
            let message_area = Rect {
                y: arena.y + top,
                height: arena.height - top,
                ..arena
            };
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .render(message_area, buf);
        }
    }

    let prompt = Line::from(vec![
        Span::styled("> ", dim_bold()),
        Span::styled(app.game_input().to_string(), Style::default().fg(Color::Cyan)),
        Span::styled("_", dim_bold()),
    ]);
    Paragraph::new(prompt).render(input_area, buf);
}
