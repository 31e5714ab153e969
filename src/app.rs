use clap::ValueEnum;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::{rngs::StdRng, SeedableRng};
use std::time::{Duration, SystemTime};

use crate::config::{Config, ConfigStore};
use crate::content::{ContentTables, Lesson};
use crate::game::{GameRound, SubmitOutcome};
use crate::schedule::{CancelToken, Firing, Scheduler, TaskKind};
use crate::session::{Phase, SessionRecord, SessionResult};
use crate::store::SessionStore;
use crate::typing::{AttemptKind, TypingAttempt};

pub const TEST_TIMER_INTERVAL: Duration = Duration::from_secs(1);
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);
/// Lessons always run against this limit
pub const LESSON_TIME_LIMIT_SECS: u32 = 60;
/// Cap on frames replayed after a stalled poll
const MAX_FRAMES_PER_POLL: u32 = 4;

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum View {
    Test,
    Learn,
    Game,
    Profile,
}

impl View {
    pub const ALL: [View; 4] = [View::Test, View::Learn, View::Game, View::Profile];

    pub fn next(self) -> Self {
        match self {
            View::Test => View::Learn,
            View::Learn => View::Game,
            View::Game => View::Profile,
            View::Profile => View::Test,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            View::Test => View::Profile,
            View::Learn => View::Test,
            View::Game => View::Learn,
            View::Profile => View::Game,
        }
    }
}

/// Which engine currently owns the input
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ActiveSession {
    None,
    Typing,
    Game,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

/// Summary shown after a test, lesson or game ends
#[derive(Debug, Clone, PartialEq)]
pub struct ResultModal {
    pub title: String,
    pub wpm: u32,
    /// `None` for game rounds
    pub accuracy: Option<u32>,
    pub extra: String,
    pub new_high_score: bool,
}

pub struct App {
    view: View,
    config: Config,
    config_store: Option<Box<dyn ConfigStore>>,
    content: ContentTables,
    store: Option<SessionStore>,
    scheduler: Scheduler,
    rng: StdRng,

    attempt: TypingAttempt,
    practice_lesson: Option<usize>,
    test_timer: Option<CancelToken>,

    game: Option<GameRound>,
    game_frame: Option<CancelToken>,
    game_input: String,
    high_score: u32,

    selected_lesson: usize,
    history: Vec<SessionRecord>,
    history_scroll: usize,
    modal: Option<ResultModal>,
    /// time of the last handled event, used when rendering
    now: SystemTime,
}

impl App {
    pub fn new(config: Config, content: ContentTables, store: Option<SessionStore>) -> Self {
        Self::with_rng(config, content, store, StdRng::from_entropy())
    }

    /// Same as `new` with a caller-provided RNG, for reproducible runs
    pub fn with_rng(
        config: Config,
        content: ContentTables,
        store: Option<SessionStore>,
        mut rng: StdRng,
    ) -> Self {
        let target = content.test_prompt(config.test_difficulty, &mut rng);
        let attempt = TypingAttempt::new(target, AttemptKind::Test, config.test_duration_secs);
        let high_score = store
            .as_ref()
            .and_then(|s| s.high_score().ok())
            .unwrap_or(0);

        Self {
            view: View::Test,
            config,
            config_store: None,
            content,
            store,
            scheduler: Scheduler::new(),
            rng,
            attempt,
            practice_lesson: None,
            test_timer: None,
            game: None,
            game_frame: None,
            game_input: String::new(),
            high_score,
            selected_lesson: 0,
            history: Vec::new(),
            history_scroll: 0,
            modal: None,
            now: SystemTime::now(),
        }
    }

    /// Persist settings changes made from inside the app
    pub fn with_config_store(mut self, store: Box<dyn ConfigStore>) -> Self {
        self.config_store = Some(store);
        self
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn attempt(&self) -> &TypingAttempt {
        &self.attempt
    }

    pub fn game(&self) -> Option<&GameRound> {
        self.game.as_ref()
    }

    pub fn game_input(&self) -> &str {
        &self.game_input
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn lessons(&self) -> &[Lesson] {
        self.content.lessons()
    }

    pub fn selected_lesson(&self) -> usize {
        self.selected_lesson
    }

    pub fn practice_lesson(&self) -> Option<&Lesson> {
        self.practice_lesson.and_then(|idx| self.content.lesson(idx))
    }

    pub fn is_practice(&self) -> bool {
        self.practice_lesson.is_some()
    }

    pub fn history(&self) -> &[SessionRecord] {
        &self.history
    }

    pub fn history_scroll(&self) -> usize {
        self.history_scroll
    }

    pub fn modal(&self) -> Option<&ResultModal> {
        self.modal.as_ref()
    }

    pub fn store(&self) -> Option<&SessionStore> {
        self.store.as_ref()
    }

    pub fn now(&self) -> SystemTime {
        self.now
    }

    pub fn has_pending_tasks(&self) -> bool {
        !self.scheduler.is_empty()
    }

    pub fn active_session(&self) -> ActiveSession {
        if self.attempt.phase() == Phase::Active {
            ActiveSession::Typing
        } else if self.game.as_ref().is_some_and(GameRound::is_active) {
            ActiveSession::Game
        } else {
            ActiveSession::None
        }
    }

    /// Show another view, tearing down whatever session the old one ran
    pub fn switch_view(&mut self, view: View) {
        self.view = view;

        if view == View::Profile {
            self.refresh_history();
        }

        if view != View::Test {
            self.practice_lesson = None;
            self.reset_test();
        }

        self.stop_game();
    }

    pub fn refresh_history(&mut self) {
        if let Some(store) = &self.store {
            self.history = store.get_all().unwrap_or_default();
            self.high_score = store.high_score().unwrap_or(self.high_score);
        }
        self.history_scroll = 0;
    }

    fn persist_config(&self) {
        if let Some(store) = &self.config_store {
            let _ = store.save(&self.config);
        }
    }

    fn cancel_test_timer(&mut self) {
        if let Some(token) = self.test_timer.take() {
            self.scheduler.cancel(token);
        }
    }

    fn attempt_kind(&self) -> AttemptKind {
        if self.is_practice() {
            AttemptKind::Practice
        } else {
            AttemptKind::Test
        }
    }

    fn fresh_target(&mut self) -> String {
        match self.practice_lesson.and_then(|idx| self.content.lesson(idx)) {
            Some(lesson) => lesson.practice_text(&mut self.rng),
            None => self
                .content
                .test_prompt(self.config.test_difficulty, &mut self.rng),
        }
    }

    fn attempt_limit(&self) -> u32 {
        if self.is_practice() {
            LESSON_TIME_LIMIT_SECS
        } else {
            self.config.test_duration_secs
        }
    }

    fn replace_attempt(&mut self, target: String) {
        self.cancel_test_timer();
        self.attempt = TypingAttempt::new(target, self.attempt_kind(), self.attempt_limit());
    }

    /// Drop the current attempt; lessons keep their text, tests draw a new one
    pub fn reset_test(&mut self) {
        let target = if self.is_practice() {
            self.attempt.target().to_string()
        } else {
            self.fresh_target()
        };
        self.replace_attempt(target);
    }

    /// Start over on the same text
    pub fn retry_test(&mut self) {
        self.cancel_test_timer();
        if !self.attempt.reset() {
            let target = self.attempt.target().to_string();
            self.replace_attempt(target);
        }
    }

    pub fn new_text(&mut self) {
        let target = self.fresh_target();
        self.replace_attempt(target);
    }

    pub fn set_timer_limit(&mut self, secs: u32) {
        self.config.test_duration_secs = secs;
        self.persist_config();
        self.reset_test();
    }

    pub fn cycle_timer_limit(&mut self) {
        let next = self.config.next_timer_limit();
        self.set_timer_limit(next);
    }

    pub fn cycle_test_difficulty(&mut self) {
        self.config.test_difficulty = self.config.test_difficulty.next();
        self.persist_config();
        self.reset_test();
    }

    pub fn cycle_game_difficulty(&mut self) {
        if self.active_session() == ActiveSession::Game {
            return;
        }
        self.config.game_difficulty = self.config.game_difficulty.next();
        self.persist_config();
    }

    pub fn select_lesson(&mut self, idx: usize) {
        let last = self.content.lessons().len().saturating_sub(1);
        self.selected_lesson = idx.min(last);
    }

    /// Switch to the test view with a drill built from the lesson's keys
    pub fn start_lesson(&mut self, idx: usize) -> bool {
        let Some(lesson) = self.content.lesson(idx) else {
            return false;
        };
        let target = lesson.practice_text(&mut self.rng);

        self.practice_lesson = Some(idx);
        self.switch_view(View::Test);
        self.replace_attempt(target);
        true
    }

    pub fn type_char(&mut self, c: char, now: SystemTime) {
        if self.modal.is_some() {
            return;
        }
        let was_idle = self.attempt.phase() == Phase::Idle;
        let finished = self.attempt.push_char(c, now);
        self.after_test_edit(was_idle, finished, now);
    }

    pub fn test_backspace(&mut self, now: SystemTime) {
        if self.modal.is_some() {
            return;
        }
        let finished = self.attempt.backspace(now);
        self.after_test_edit(false, finished, now);
    }

    fn after_test_edit(&mut self, was_idle: bool, finished: Option<SessionResult>, now: SystemTime) {
        if was_idle && self.attempt.phase() != Phase::Idle {
            self.cancel_test_timer();
            self.test_timer = Some(
                self.scheduler
                    .schedule(TaskKind::TestTimer, TEST_TIMER_INTERVAL, now),
            );
        }
        if let Some(result) = finished {
            self.on_test_finished(result);
        }
    }

    fn on_test_finished(&mut self, result: SessionResult) {
        self.cancel_test_timer();
        if let Some(store) = &self.store {
            let _ = store.save(&result);
        }

        let corrected = self.attempt.result().map(|m| m.corrected).unwrap_or(0);
        self.modal = Some(ResultModal {
            title: if self.is_practice() {
                "Practice Complete".to_string()
            } else {
                "Test Complete".to_string()
            },
            wpm: result.wpm,
            accuracy: result.score.accuracy(),
            extra: format!("Fixed Errors: {corrected}"),
            new_high_score: false,
        });
    }

    pub fn start_game(&mut self, now: SystemTime) -> bool {
        if self.active_session() != ActiveSession::None {
            return false;
        }
        self.stop_game();

        let difficulty = self.config.game_difficulty;
        let mut round = GameRound::new(difficulty, self.content.words(difficulty).to_vec());
        round.start(now);

        self.game = Some(round);
        self.game_input.clear();
        self.game_frame = Some(
            self.scheduler
                .schedule(TaskKind::GameFrame, FRAME_INTERVAL, now),
        );
        true
    }

    /// Cancel the frame task, then tear the round down
    pub fn stop_game(&mut self) {
        if let Some(token) = self.game_frame.take() {
            self.scheduler.cancel(token);
        }
        if let Some(round) = self.game.as_mut() {
            round.stop();
        }
        self.game = None;
        self.game_input.clear();
    }

    pub fn game_char(&mut self, c: char) {
        if self.active_session() == ActiveSession::Game {
            self.game_input.push(c);
        }
    }

    pub fn game_backspace(&mut self) {
        self.game_input.pop();
    }

    /// Resolve the typed word; the input is cleared whatever the outcome
    pub fn submit_game_word(&mut self) -> SubmitOutcome {
        let outcome = match self.game.as_mut() {
            Some(round) => round.on_submit(&self.game_input),
            None => SubmitOutcome::Inactive,
        };
        self.game_input.clear();
        outcome
    }

    fn on_game_finished(&mut self, result: SessionResult) {
        if let Some(token) = self.game_frame.take() {
            self.scheduler.cancel(token);
        }
        self.game_input.clear();

        let points = result.score.points().unwrap_or(0);
        let mut new_high_score = false;
        if let Some(store) = &self.store {
            let _ = store.save(&result);
            new_high_score = store.record_high_score(points).unwrap_or(false);
        } else if points > self.high_score {
            new_high_score = true;
        }
        if new_high_score {
            self.high_score = points;
        }

        self.modal = Some(ResultModal {
            title: "Game Over".to_string(),
            wpm: result.wpm,
            accuracy: None,
            extra: format!("Final Score: {points}"),
            new_high_score,
        });
    }

    pub fn close_modal(&mut self) {
        if self.modal.take().is_some() {
            self.reset_test();
        }
    }

    /// Run every scheduled task that has come due
    pub fn poll(&mut self, now: SystemTime) {
        self.now = now;
        for firing in self.scheduler.due(now) {
            self.dispatch(firing, now);
        }
    }

    fn dispatch(&mut self, firing: Firing, now: SystemTime) {
        match firing.kind {
            TaskKind::TestTimer => {
                if self.test_timer != Some(firing.token) {
                    self.scheduler.cancel(firing.token);
                    return;
                }
                for _ in 0..firing.count {
                    if let Some(result) = self.attempt.on_timer_tick(now) {
                        self.on_test_finished(result);
                        break;
                    }
                }
            }
            TaskKind::GameFrame => {
                if self.game_frame != Some(firing.token) {
                    self.scheduler.cancel(firing.token);
                    return;
                }
                let mut finished = None;
                if let Some(round) = self.game.as_mut() {
                    for _ in 0..firing.count.min(MAX_FRAMES_PER_POLL) {
                        finished = round.on_frame(now, &mut self.rng);
                        if finished.is_some() {
                            break;
                        }
                    }
                }
                if let Some(result) = finished {
                    self.on_game_finished(result);
                }
            }
        }
    }

    /// Route one key press to the current view
    pub fn handle_key(&mut self, key: KeyEvent, now: SystemTime) -> KeyOutcome {
        self.now = now;
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key.code == KeyCode::Char('c') {
            return KeyOutcome::Quit;
        }

        if self.modal.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.close_modal();
            }
            return KeyOutcome::Continue;
        }

        match key.code {
            KeyCode::Esc => return KeyOutcome::Quit,
            KeyCode::Tab => {
                self.switch_view(self.view.next());
                return KeyOutcome::Continue;
            }
            KeyCode::BackTab => {
                self.switch_view(self.view.prev());
                return KeyOutcome::Continue;
            }
            _ => {}
        }

        match self.view {
            View::Test => match key.code {
                KeyCode::Char('t') if ctrl => self.cycle_timer_limit(),
                KeyCode::Char('d') if ctrl => self.cycle_test_difficulty(),
                KeyCode::Char('r') if ctrl => self.new_text(),
                KeyCode::Left => self.retry_test(),
                KeyCode::Backspace => self.test_backspace(now),
                KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                    self.type_char(c, now)
                }
                _ => {}
            },
            View::Learn => match key.code {
                KeyCode::Up => self.select_lesson(self.selected_lesson.saturating_sub(1)),
                KeyCode::Down => self.select_lesson(self.selected_lesson + 1),
                KeyCode::Enter => {
                    self.start_lesson(self.selected_lesson);
                }
                _ => {}
            },
            View::Game => {
                if self.active_session() == ActiveSession::Game {
                    match key.code {
                        KeyCode::Enter | KeyCode::Char(' ') => {
                            self.submit_game_word();
                        }
                        KeyCode::Backspace => self.game_backspace(),
                        KeyCode::Char(c) if !ctrl => self.game_char(c),
                        _ => {}
                    }
                } else {
                    match key.code {
                        KeyCode::Char('d') if ctrl => self.cycle_game_difficulty(),
                        KeyCode::Enter => {
                            self.start_game(now);
                        }
                        _ => {}
                    }
                }
            }
            View::Profile => match key.code {
                KeyCode::Up => self.history_scroll = self.history_scroll.saturating_sub(1),
                KeyCode::Down => {
                    if self.history_scroll + 1 < self.history.len() {
                        self.history_scroll += 1;
                    }
                }
                _ => {}
            },
        }

        KeyOutcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileConfigStore;
    use crate::content::Difficulty;
    use crate::game::SPAWN_INTERVAL;
    use crate::session::SessionKind;
    use assert_matches::assert_matches;

    fn app() -> App {
        App::with_rng(
            Config::default(),
            ContentTables::embedded().unwrap(),
            Some(SessionStore::in_memory().unwrap()),
            StdRng::seed_from_u64(11),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_target(app: &mut App, now: SystemTime) {
        let target = app.attempt().target().to_string();
        for c in target.chars() {
            app.type_char(c, now);
        }
    }

    #[test]
    fn test_starts_in_idle_test_view() {
        let app = app();

        assert_eq!(app.view(), View::Test);
        assert_eq!(app.active_session(), ActiveSession::None);
        assert!(!app.attempt().target().is_empty());
        assert!(!app.has_pending_tasks());
    }

    #[test]
    fn test_first_keystroke_schedules_timer() {
        let mut app = app();
        let t0 = SystemTime::now();

        app.handle_key(key(KeyCode::Char('x')), t0);

        assert_eq!(app.active_session(), ActiveSession::Typing);
        assert!(app.has_pending_tasks());
    }

    #[test]
    fn test_timer_poll_counts_down() {
        let mut app = app();
        let t0 = SystemTime::now();
        app.type_char('x', t0);

        app.poll(t0 + Duration::from_millis(2500));
        assert_eq!(app.attempt().seconds_remaining(), 58);
    }

    #[test]
    fn test_timeout_saves_one_record_and_opens_modal() {
        let mut app = app();
        let t0 = SystemTime::now();
        app.set_timer_limit(15);
        app.type_char('x', t0);

        app.poll(t0 + Duration::from_secs(20));

        assert!(app.attempt().has_finished());
        assert!(!app.has_pending_tasks());
        assert_eq!(app.store().unwrap().count().unwrap(), 1);
        let modal = app.modal().unwrap();
        assert_eq!(modal.title, "Test Complete");
        assert!(modal.extra.starts_with("Fixed Errors"));

        // later polls do nothing
        app.poll(t0 + Duration::from_secs(40));
        assert_eq!(app.store().unwrap().count().unwrap(), 1);
    }

    #[test]
    fn test_completing_text_saves_one_record() {
        let mut app = app();
        let t0 = SystemTime::now();

        type_target(&mut app, t0 + Duration::from_secs(5));

        assert!(app.attempt().has_finished());
        assert_eq!(app.store().unwrap().count().unwrap(), 1);
        let record = &app.store().unwrap().get_all().unwrap()[0];
        assert_eq!(record.kind, SessionKind::Test);
        assert!(!app.has_pending_tasks());
    }

    #[test]
    fn test_modal_blocks_typing_and_closes_to_fresh_attempt() {
        let mut app = app();
        let t0 = SystemTime::now();
        type_target(&mut app, t0);
        assert!(app.modal().is_some());

        app.handle_key(key(KeyCode::Char('a')), t0);
        assert!(app.attempt().has_finished());

        app.handle_key(key(KeyCode::Enter), t0);
        assert!(app.modal().is_none());
        assert_eq!(app.attempt().phase(), Phase::Idle);
    }

    #[test]
    fn test_switching_view_cancels_test_timer() {
        let mut app = app();
        let t0 = SystemTime::now();
        app.type_char('x', t0);
        assert_eq!(app.active_session(), ActiveSession::Typing);

        app.handle_key(key(KeyCode::Tab), t0);

        assert_eq!(app.view(), View::Learn);
        assert_eq!(app.active_session(), ActiveSession::None);
        assert!(!app.has_pending_tasks());

        app.poll(t0 + Duration::from_secs(120));
        assert_eq!(app.store().unwrap().count().unwrap(), 0);
    }

    #[test]
    fn test_view_cycle() {
        for view in View::ALL {
            assert_eq!(view.next().prev(), view);
        }
        assert_eq!(View::Profile.next(), View::Test);
    }

    #[test]
    fn test_lesson_starts_practice_attempt() {
        let mut app = app();
        app.switch_view(View::Learn);
        app.handle_key(key(KeyCode::Down), SystemTime::now());
        app.handle_key(key(KeyCode::Enter), SystemTime::now());

        assert_eq!(app.view(), View::Test);
        assert!(app.is_practice());
        assert_eq!(app.practice_lesson().unwrap().title, "Top Row Reach");
        assert_eq!(app.attempt().kind(), AttemptKind::Practice);
        assert_eq!(app.attempt().time_limit_secs(), LESSON_TIME_LIMIT_SECS);
        assert!(app
            .attempt()
            .target()
            .chars()
            .all(|c| c == ' ' || "qwertyuiop".contains(c)));
    }

    #[test]
    fn test_lesson_limit_leaves_saved_duration_alone() {
        let dir = tempfile::tempdir().unwrap();
        let config_store = FileConfigStore::with_path(dir.path().join("config.json"));
        let mut app = app().with_config_store(Box::new(config_store.clone()));
        app.set_timer_limit(15);

        assert!(app.start_lesson(0));
        assert_eq!(app.attempt().time_limit_secs(), LESSON_TIME_LIMIT_SECS);
        assert_eq!(app.config().test_duration_secs, 15);

        app.handle_key(ctrl('d'), SystemTime::now());
        assert!(app.is_practice());
        assert_eq!(app.attempt().time_limit_secs(), LESSON_TIME_LIMIT_SECS);
        assert_eq!(config_store.load().test_duration_secs, 15);

        app.switch_view(View::Learn);
        app.switch_view(View::Test);
        assert_eq!(app.attempt().time_limit_secs(), 15);
    }

    #[test]
    fn test_practice_reset_keeps_text_until_view_changes() {
        let mut app = app();
        assert!(app.start_lesson(0));
        let text = app.attempt().target().to_string();

        app.reset_test();
        assert_eq!(app.attempt().target(), text);

        app.switch_view(View::Profile);
        assert!(!app.is_practice());
        assert_eq!(app.attempt().kind(), AttemptKind::Test);
    }

    #[test]
    fn test_practice_completion_title() {
        let mut app = app();
        app.start_lesson(3);
        type_target(&mut app, SystemTime::now());

        assert_eq!(app.modal().unwrap().title, "Practice Complete");
        let record = &app.store().unwrap().get_all().unwrap()[0];
        assert_eq!(record.kind, SessionKind::Practice);
    }

    #[test]
    fn test_unknown_lesson() {
        let mut app = app();
        assert!(!app.start_lesson(99));
        assert!(!app.is_practice());
    }

    #[test]
    fn test_retry_keeps_target() {
        let mut app = app();
        let t0 = SystemTime::now();
        let target = app.attempt().target().to_string();
        app.type_char('x', t0);

        app.handle_key(key(KeyCode::Left), t0);

        assert_eq!(app.attempt().target(), target);
        assert_eq!(app.attempt().phase(), Phase::Idle);
        assert!(!app.has_pending_tasks());
    }

    #[test]
    fn test_settings_shortcuts() {
        let mut app = app();
        let t0 = SystemTime::now();

        app.handle_key(ctrl('t'), t0);
        assert_eq!(app.config().test_duration_secs, 120);
        assert_eq!(app.attempt().seconds_remaining(), 120);

        app.handle_key(ctrl('d'), t0);
        assert_eq!(app.config().test_difficulty, Difficulty::Hard);
        assert!(app.attempt().typed().is_empty());
    }

    #[test]
    fn test_game_start_and_submit() {
        let mut app = app();
        let t0 = SystemTime::now();
        app.switch_view(View::Game);

        app.handle_key(key(KeyCode::Enter), t0);
        assert_eq!(app.active_session(), ActiveSession::Game);
        assert!(app.has_pending_tasks());

        app.poll(t0 + SPAWN_INTERVAL + Duration::from_millis(20));
        let word = app.game().unwrap().targets()[0].word.clone();

        for c in word.to_uppercase().chars() {
            app.handle_key(key(KeyCode::Char(c)), t0);
        }
        app.handle_key(key(KeyCode::Char(' ')), t0);

        assert_eq!(app.game_input(), "");
        assert_eq!(app.game().unwrap().score(), word.len() as u32 * 10);
        assert!(app.game().unwrap().targets().is_empty());
    }

    #[test]
    fn test_game_unmatched_submit_clears_input_only() {
        let mut app = app();
        let t0 = SystemTime::now();
        app.switch_view(View::Game);
        app.start_game(t0);

        for c in "zzz".chars() {
            app.game_char(c);
        }
        assert_eq!(app.submit_game_word(), SubmitOutcome::NoMatch);
        assert_eq!(app.game_input(), "");
        assert_eq!(app.game().unwrap().score(), 0);
    }

    #[test]
    fn test_game_over_saves_record_and_high_score() {
        let mut app = app();
        let t0 = SystemTime::now();
        app.switch_view(View::Game);
        app.start_game(t0);

        // let every word fall through until the lives run out
        let mut now = t0;
        for _ in 0..200_000 {
            now += FRAME_INTERVAL;
            app.poll(now);
            if app.modal().is_some() {
                break;
            }
        }

        let modal = app.modal().expect("round should end once lives run out");
        assert_eq!(modal.title, "Game Over");
        assert_eq!(modal.accuracy, None);
        assert_eq!(modal.extra, "Final Score: 0");
        assert!(!modal.new_high_score);
        assert_eq!(app.active_session(), ActiveSession::None);
        assert!(!app.has_pending_tasks());

        let records = app.store().unwrap().get_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_matches!(records[0].kind, SessionKind::Game(Difficulty::Medium));
    }

    #[test]
    fn test_leaving_game_view_stops_round() {
        let mut app = app();
        let t0 = SystemTime::now();
        app.switch_view(View::Game);
        app.start_game(t0);

        app.switch_view(View::Profile);

        assert!(app.game().is_none());
        assert!(!app.has_pending_tasks());
        app.poll(t0 + Duration::from_secs(600));
        assert_eq!(app.store().unwrap().count().unwrap(), 0);
    }

    #[test]
    fn test_game_cannot_start_while_typing() {
        let mut app = app();
        let t0 = SystemTime::now();
        app.type_char('x', t0);

        assert!(!app.start_game(t0));
        assert_eq!(app.active_session(), ActiveSession::Typing);
    }

    #[test]
    fn test_game_difficulty_cycles_only_between_rounds() {
        let mut app = app();
        let t0 = SystemTime::now();
        app.switch_view(View::Game);

        app.handle_key(ctrl('d'), t0);
        assert_eq!(app.config().game_difficulty, Difficulty::Hard);

        app.start_game(t0);
        app.cycle_game_difficulty();
        assert_eq!(app.config().game_difficulty, Difficulty::Hard);
        assert_eq!(app.game().unwrap().difficulty(), Difficulty::Hard);
    }

    #[test]
    fn test_profile_loads_history() {
        let mut app = app();
        type_target(&mut app, SystemTime::now());
        app.close_modal();

        app.switch_view(View::Profile);
        assert_eq!(app.history().len(), 1);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        let t0 = SystemTime::now();
        assert_eq!(app.handle_key(key(KeyCode::Esc), t0), KeyOutcome::Quit);
        assert_eq!(app.handle_key(ctrl('c'), t0), KeyOutcome::Quit);
    }

    #[test]
    fn test_works_without_store() {
        let mut app = App::with_rng(
            Config::default(),
            ContentTables::embedded().unwrap(),
            None,
            StdRng::seed_from_u64(3),
        );
        type_target(&mut app, SystemTime::now());

        assert!(app.modal().is_some());
        app.switch_view(View::Profile);
        assert!(app.history().is_empty());
    }
}
