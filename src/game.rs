use rand::{seq::SliceRandom, Rng};
use std::time::{Duration, SystemTime};

use crate::content::Difficulty;
use crate::session::{Phase, SessionResult};

pub const START_LIVES: u32 = 3;
/// Arena units travelled per frame at the start of a round
pub const START_SPEED: f64 = 0.7;
/// Speed added after every spawn
pub const SPEED_STEP: f64 = 0.008;
pub const SPAWN_INTERVAL: Duration = Duration::from_millis(2800);
pub const POINTS_PER_CHAR: u32 = 10;

/// Arena geometry, in abstract units the renderer scales to the screen
pub const ARENA_WIDTH: f64 = 800.0;
pub const SPAWN_Y: f64 = -130.0;
pub const BOTTOM_BOUNDARY: f64 = 480.0;
const TARGET_WIDTH: f64 = 130.0;
const SPAWN_MARGIN: f64 = 10.0;

const LIVE_WPM_THRESHOLD_SECS: f64 = 3.0;
const MIN_FINAL_MINUTES: f64 = 0.01;

/// A word falling down the arena
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    /// spawn sequence number, lower spawned earlier
    pub id: u64,
    pub word: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Matched { word: String, points: u32 },
    NoMatch,
    /// the round is not running
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSnapshot {
    pub phase: Phase,
    pub difficulty: Difficulty,
    pub score: u32,
    pub lives: u32,
    pub wpm: u32,
    pub active_targets: usize,
}

/// One life-limited round of the falling-word game
#[derive(Debug, Clone)]
pub struct GameRound {
    difficulty: Difficulty,
    pool: Vec<String>,
    score: u32,
    lives: u32,
    targets: Vec<Target>,
    speed: f64,
    last_spawn: Option<SystemTime>,
    started_at: Option<SystemTime>,
    total_chars: u32,
    missed: u32,
    next_id: u64,
    phase: Phase,
    final_wpm: Option<u32>,
}

impl GameRound {
    pub fn new(difficulty: Difficulty, pool: Vec<String>) -> Self {
        Self {
            difficulty,
            pool,
            score: 0,
            lives: START_LIVES,
            targets: Vec::new(),
            speed: START_SPEED,
            last_spawn: None,
            started_at: None,
            total_chars: 0,
            missed: 0,
            next_id: 0,
            phase: Phase::Idle,
            final_wpm: None,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn missed(&self) -> u32 {
        self.missed
    }

    pub fn total_chars(&self) -> u32 {
        self.total_chars
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    /// Idle -> Active. The first spawn comes one interval later.
    pub fn start(&mut self, now: SystemTime) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.phase = Phase::Active;
        self.started_at = Some(now);
        self.last_spawn = Some(now);
        true
    }

    /// Abandon the round without producing a result
    pub fn stop(&mut self) {
        self.targets.clear();
        if self.phase == Phase::Active {
            self.phase = Phase::Finished;
        }
    }

    /// Advance one frame: maybe spawn, move every target, charge lives for misses.
    ///
    /// Returns the round's result when the last life is lost.
    pub fn on_frame<R: Rng + ?Sized>(
        &mut self,
        now: SystemTime,
        rng: &mut R,
    ) -> Option<SessionResult> {
        if self.phase != Phase::Active {
            return None;
        }

        let spawn_due = self
            .last_spawn
            .map(|last| now.duration_since(last).unwrap_or_default() > SPAWN_INTERVAL)
            .unwrap_or(false);
        if spawn_due {
            self.spawn(rng);
            self.last_spawn = Some(now);
            self.speed += SPEED_STEP;
        }

        let speed = self.speed;
        self.targets.iter_mut().for_each(|t| t.y += speed);

        let before = self.targets.len();
        self.targets.retain(|t| t.y <= BOTTOM_BOUNDARY);
        let crossed = (before - self.targets.len()) as u32;

        self.missed += crossed;
        self.lives = self.lives.saturating_sub(crossed);

        if self.lives == 0 {
            return Some(self.finish(now));
        }

        None
    }

    fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let Some(word) = self.pool.choose(rng) else {
            return;
        };
        let word = word.to_lowercase();
        let x = rng.gen::<f64>() * (ARENA_WIDTH - TARGET_WIDTH) + SPAWN_MARGIN;

        self.targets.push(Target {
            id: self.next_id,
            word,
            x,
            y: SPAWN_Y,
        });
        self.next_id += 1;
    }

    /// Resolve a submitted word against the active targets.
    ///
    /// Matching is exact and case-insensitive; among duplicates the
    /// earliest-spawned target is taken.
    pub fn on_submit(&mut self, typed: &str) -> SubmitOutcome {
        if self.phase != Phase::Active {
            return SubmitOutcome::Inactive;
        }

        let word = typed.trim().to_lowercase();
        if word.is_empty() {
            return SubmitOutcome::NoMatch;
        }

        let found = self
            .targets
            .iter()
            .enumerate()
            .filter(|(_, t)| t.word.to_lowercase() == word)
            .min_by_key(|(_, t)| t.id)
            .map(|(idx, _)| idx);

        match found {
            Some(idx) => {
                let target = self.targets.remove(idx);
                let len = target.word.chars().count() as u32;
                let points = len * POINTS_PER_CHAR;
                self.total_chars += len;
                self.score += points;
                SubmitOutcome::Matched {
                    word: target.word,
                    points,
                }
            }
            None => SubmitOutcome::NoMatch,
        }
    }

    /// Live WPM from matched characters, or the final figure once over
    pub fn wpm(&self, now: SystemTime) -> u32 {
        if let Some(wpm) = self.final_wpm {
            return wpm;
        }

        let Some(start) = self.started_at else {
            return 0;
        };
        let elapsed = now.duration_since(start).unwrap_or_default().as_secs_f64();
        if self.phase != Phase::Active
            || elapsed <= LIVE_WPM_THRESHOLD_SECS
            || self.total_chars == 0
        {
            return 0;
        }

        chars_to_wpm(self.total_chars, elapsed / 60.0)
    }

    fn finish(&mut self, now: SystemTime) -> SessionResult {
        let minutes = self
            .started_at
            .map(|start| now.duration_since(start).unwrap_or_default().as_secs_f64() / 60.0)
            .unwrap_or_default()
            .max(MIN_FINAL_MINUTES);

        let wpm = chars_to_wpm(self.total_chars, minutes);
        self.final_wpm = Some(wpm);
        self.phase = Phase::Finished;
        self.targets.clear();

        SessionResult::game(self.difficulty, wpm, self.score)
    }

    pub fn snapshot(&self, now: SystemTime) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            difficulty: self.difficulty,
            score: self.score,
            lives: self.lives,
            wpm: self.wpm(now),
            active_targets: self.targets.len(),
        }
    }
}

fn chars_to_wpm(chars: u32, minutes: f64) -> u32 {
    ((chars as f64 / 5.0) / minutes).round() as u32
}
