use crate::session::{Phase, SessionKind, SessionResult};
use std::time::{Duration, SystemTime};

/// Live WPM stays at zero until this much time has passed
pub const LIVE_WPM_THRESHOLD_SECS: f64 = 1.8;
/// Final WPM guard against near-zero elapsed time
pub const FINAL_WPM_THRESHOLD_SECS: f64 = 0.3;
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 60;
/// Characters per standardized word
const CHARS_PER_WORD: f64 = 5.0;

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum AttemptKind {
    Test,
    Practice,
}

impl From<AttemptKind> for SessionKind {
    fn from(kind: AttemptKind) -> Self {
        match kind {
            AttemptKind::Test => SessionKind::Test,
            AttemptKind::Practice => SessionKind::Practice,
        }
    }
}

/// Per-character rendering state of the target text
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum CharState {
    Correct,
    Incorrect,
    Current,
    Pending,
}

/// Read-only snapshot handed to the presentation layer
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub struct TypingMetrics {
    pub wpm: u32,
    pub accuracy: u32,
    /// positions currently differing from the target
    pub mismatches: usize,
    /// every wrong keystroke ever made
    pub mistakes: usize,
    pub corrected: usize,
    pub seconds_remaining: u32,
}

/// One timed attempt against a target text
#[derive(Debug, Clone)]
pub struct TypingAttempt {
    target: String,
    typed: String,
    mistakes: usize,
    started_at: Option<SystemTime>,
    time_limit_secs: u32,
    seconds_remaining: u32,
    phase: Phase,
    kind: AttemptKind,
    final_metrics: Option<TypingMetrics>,
}

impl TypingAttempt {
    pub fn new(target: String, kind: AttemptKind, time_limit_secs: u32) -> Self {
        Self {
            target,
            typed: String::new(),
            mistakes: 0,
            started_at: None,
            time_limit_secs,
            seconds_remaining: time_limit_secs,
            phase: Phase::Idle,
            kind,
            final_metrics: None,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn kind(&self) -> AttemptKind {
        self.kind
    }

    pub fn mistakes(&self) -> usize {
        self.mistakes
    }

    pub fn started_at(&self) -> Option<SystemTime> {
        self.started_at
    }

    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn has_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Frozen metrics of a finished attempt
    pub fn result(&self) -> Option<TypingMetrics> {
        self.final_metrics
    }

    /// Number of typed positions that currently differ from the target
    pub fn mismatches(&self) -> usize {
        let mut expected = self.target.chars();
        self.typed
            .chars()
            .filter(|c| expected.next() != Some(*c))
            .count()
    }

    /// Feed the full contents of the input field after an edit.
    ///
    /// Returns the session result if this edit completed the attempt.
    pub fn on_keystroke(&mut self, prefix: &str, now: SystemTime) -> Option<SessionResult> {
        match self.phase {
            Phase::Finished => return None,
            Phase::Idle if prefix.is_empty() => return None,
            Phase::Idle => {
                self.phase = Phase::Active;
                self.started_at = Some(now);
            }
            Phase::Active => {}
        }

        let new_len = prefix.chars().count();
        if new_len > self.typed.chars().count() {
            let expected = self.target.chars().nth(new_len - 1);
            if prefix.chars().last() != expected {
                self.mistakes += 1;
            }
        }
        self.typed = prefix.to_string();

        if self.typed == self.target {
            return Some(self.finish(now));
        }

        None
    }

    pub fn push_char(&mut self, c: char, now: SystemTime) -> Option<SessionResult> {
        let mut next = self.typed.clone();
        next.push(c);
        self.on_keystroke(&next, now)
    }

    pub fn backspace(&mut self, now: SystemTime) -> Option<SessionResult> {
        if self.typed.is_empty() {
            return None;
        }
        let mut next = self.typed.clone();
        next.pop();
        self.on_keystroke(&next, now)
    }

    /// One-second countdown step; finishes the attempt when time runs out
    pub fn on_timer_tick(&mut self, now: SystemTime) -> Option<SessionResult> {
        if self.phase != Phase::Active {
            return None;
        }

        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining == 0 {
            return Some(self.finish(now));
        }

        None
    }

    pub fn elapsed(&self, now: SystemTime) -> Option<Duration> {
        self.started_at
            .map(|start| now.duration_since(start).unwrap_or_default())
    }

    /// Live metrics, or the frozen ones once the attempt has finished
    pub fn metrics(&self, now: SystemTime) -> TypingMetrics {
        if let Some(metrics) = self.final_metrics {
            return metrics;
        }

        let typed_len = self.typed.chars().count();
        let mismatches = self.mismatches();

        let wpm = match (self.phase, self.elapsed(now)) {
            (Phase::Active, Some(elapsed)) if elapsed.as_secs_f64() > LIVE_WPM_THRESHOLD_SECS => {
                net_wpm(typed_len, mismatches, elapsed)
            }
            _ => 0,
        };

        let accuracy = if typed_len == 0 {
            100
        } else {
            accuracy_pct(typed_len, mismatches)
        };

        TypingMetrics {
            wpm,
            accuracy,
            mismatches,
            mistakes: self.mistakes,
            corrected: self.mistakes.saturating_sub(mismatches),
            seconds_remaining: self.seconds_remaining,
        }
    }

    fn finish(&mut self, now: SystemTime) -> SessionResult {
        let typed_len = self.typed.chars().count();
        let mismatches = self.mismatches();
        let elapsed = self.elapsed(now).unwrap_or_default();

        let wpm = if elapsed.as_secs_f64() > FINAL_WPM_THRESHOLD_SECS {
            net_wpm(typed_len, mismatches, elapsed)
        } else {
            0
        };

        let metrics = TypingMetrics {
            wpm,
            accuracy: accuracy_pct(typed_len, mismatches),
            mismatches,
            mistakes: self.mistakes,
            corrected: self.mistakes.saturating_sub(mismatches),
            seconds_remaining: self.seconds_remaining,
        };

        self.final_metrics = Some(metrics);
        self.phase = Phase::Finished;

        SessionResult::typing(self.kind.into(), metrics.wpm, metrics.accuracy)
    }

    /// Back to Idle with the same target. Refused while Active.
    pub fn reset(&mut self) -> bool {
        if !self.phase.can_reset() {
            return false;
        }

        self.typed.clear();
        self.mistakes = 0;
        self.started_at = None;
        self.seconds_remaining = self.time_limit_secs;
        self.phase = Phase::Idle;
        self.final_metrics = None;
        true
    }

    /// Per-character view of the target for rendering
    pub fn char_states(&self) -> Vec<CharState> {
        let typed: Vec<char> = self.typed.chars().collect();
        self.target
            .chars()
            .enumerate()
            .map(|(idx, expected)| match typed.get(idx) {
                Some(c) if *c == expected => CharState::Correct,
                Some(_) => CharState::Incorrect,
                None if idx == typed.len() => CharState::Current,
                None => CharState::Pending,
            })
            .collect()
    }
}

fn net_wpm(typed_len: usize, mismatches: usize, elapsed: Duration) -> u32 {
    let minutes = elapsed.as_secs_f64() / 60.0;
    if minutes <= 0.0 {
        return 0;
    }
    let net_words = (typed_len as f64 / CHARS_PER_WORD - mismatches as f64).max(0.0);
    (net_words / minutes).round() as u32
}

fn accuracy_pct(typed_len: usize, mismatches: usize) -> u32 {
    let correct = typed_len.saturating_sub(mismatches);
    ((correct as f64 / typed_len.max(1) as f64) * 100.0).round() as u32
}
