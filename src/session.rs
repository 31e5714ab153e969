use chrono::{DateTime, Local};
use std::fmt;

use crate::content::Difficulty;

/// Lifecycle shared by typing attempts and game rounds.
///
/// `Idle -> Active -> Finished -> Idle`; only Idle and Finished may be reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Active,
    Finished,
}

impl Phase {
    pub fn can_reset(self) -> bool {
        !matches!(self, Phase::Active)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Test,
    Practice,
    Game(Difficulty),
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKind::Test => write!(f, "Test"),
            SessionKind::Practice => write!(f, "Practice"),
            SessionKind::Game(difficulty) => write!(f, "Game ({difficulty})"),
        }
    }
}

impl SessionKind {
    /// Inverse of `Display`, used when reading stored history
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Test" => Some(SessionKind::Test),
            "Practice" => Some(SessionKind::Practice),
            other => other
                .strip_prefix("Game (")
                .and_then(|rest| rest.strip_suffix(')'))
                .and_then(Difficulty::parse)
                .map(SessionKind::Game),
        }
    }

    pub fn is_game(&self) -> bool {
        matches!(self, SessionKind::Game(_))
    }
}

/// Accuracy for typing sessions, points for game rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Accuracy(u32),
    Points(u32),
}

impl Score {
    pub fn accuracy(&self) -> Option<u32> {
        match self {
            Score::Accuracy(acc) => Some(*acc),
            Score::Points(_) => None,
        }
    }

    pub fn points(&self) -> Option<u32> {
        match self {
            Score::Points(points) => Some(*points),
            Score::Accuracy(_) => None,
        }
    }
}

/// What an engine emits when a session finishes. The store stamps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionResult {
    pub kind: SessionKind,
    pub wpm: u32,
    pub score: Score,
}

impl SessionResult {
    pub fn typing(kind: SessionKind, wpm: u32, accuracy: u32) -> Self {
        Self {
            kind,
            wpm,
            score: Score::Accuracy(accuracy),
        }
    }

    pub fn game(difficulty: Difficulty, wpm: u32, points: u32) -> Self {
        Self {
            kind: SessionKind::Game(difficulty),
            wpm,
            score: Score::Points(points),
        }
    }
}

/// A stored, immutable history entry
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub id: i64,
    pub kind: SessionKind,
    pub wpm: u32,
    pub score: Score,
    pub timestamp: DateTime<Local>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_reset_rules() {
        assert!(Phase::Idle.can_reset());
        assert!(!Phase::Active.can_reset());
        assert!(Phase::Finished.can_reset());
        assert_eq!(Phase::default(), Phase::Idle);
    }

    #[test]
    fn test_session_kind_display() {
        assert_eq!(SessionKind::Test.to_string(), "Test");
        assert_eq!(SessionKind::Practice.to_string(), "Practice");
        assert_eq!(
            SessionKind::Game(Difficulty::Medium).to_string(),
            "Game (medium)"
        );
    }

    #[test]
    fn test_session_kind_parse() {
        for kind in [
            SessionKind::Test,
            SessionKind::Practice,
            SessionKind::Game(Difficulty::Easy),
            SessionKind::Game(Difficulty::Hard),
        ] {
            assert_eq!(SessionKind::parse(&kind.to_string()), Some(kind));
        }
        assert_eq!(SessionKind::parse("Game (brutal)"), None);
        assert_eq!(SessionKind::parse("Quiz"), None);
    }

    #[test]
    fn test_score_accessors() {
        assert_eq!(Score::Accuracy(97).accuracy(), Some(97));
        assert_eq!(Score::Accuracy(97).points(), None);
        assert_eq!(Score::Points(120).points(), Some(120));
        assert_eq!(Score::Points(120).accuracy(), None);
    }

    #[test]
    fn test_result_constructors() {
        let r = SessionResult::typing(SessionKind::Practice, 40, 95);
        assert_eq!(r.score, Score::Accuracy(95));
        assert!(!r.kind.is_game());

        let g = SessionResult::game(Difficulty::Hard, 12, 300);
        assert_eq!(g.kind, SessionKind::Game(Difficulty::Hard));
        assert_eq!(g.score, Score::Points(300));
        assert!(g.kind.is_game());
    }
}
