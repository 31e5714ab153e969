use ratatui::{buffer::Buffer, layout::Rect};

use crate::app::{ActiveSession, App, View};
use crate::ui::{game_view, learn_view, profile_view, typing_view};

/// A UI Screen boundary: draws one view's body and names its keys
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
    fn legend(&self, app: &App) -> String;
}

/// Typing test and lesson practice
pub struct TypingScreen;

impl Screen for TypingScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        typing_view::render(app, area, buf);
    }

    fn legend(&self, _app: &App) -> String {
        "(ctrl-t) timer / (ctrl-d) difficulty / (ctrl-r) new text / (←) retry / (tab) view / (esc)ape"
            .to_string()
    }
}

/// Lesson browser
pub struct LearnScreen;

impl Screen for LearnScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        learn_view::render(app, area, buf);
    }

    fn legend(&self, _app: &App) -> String {
        "(↑/↓) select / (enter) practice / (tab) view / (esc)ape".to_string()
    }
}

pub struct GameScreen;

impl Screen for GameScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        game_view::render(app, area, buf);
    }

    fn legend(&self, app: &App) -> String {
        if app.active_session() == ActiveSession::Game {
            "(space/enter) submit word / (tab) view / (esc)ape".to_string()
        } else {
            "(enter) start / (ctrl-d) difficulty / (tab) view / (esc)ape".to_string()
        }
    }
}

/// Session history and graph
pub struct ProfileScreen;

impl Screen for ProfileScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        profile_view::render(app, area, buf);
    }

    fn legend(&self, _app: &App) -> String {
        "(↑/↓) scroll / (tab) view / (esc)ape".to_string()
    }
}

/// Helper to construct the screen for the current view
pub fn current_screen(view: View) -> Box<dyn Screen> {
    match view {
        View::Test => Box::new(TypingScreen),
        View::Learn => Box::new(LearnScreen),
        View::Game => Box::new(GameScreen),
        View::Profile => Box::new(ProfileScreen),
    }
}
