use tempfile::tempdir;
use typemaster::content::Difficulty;
use typemaster::history::{graph_points, newest_first, summarize};
use typemaster::session::{Score, SessionKind, SessionResult};
use typemaster::store::SessionStore;

#[test]
fn history_survives_reopen_in_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state").join("history.db");

    {
        let store = SessionStore::open(&path).unwrap();
        store
            .save(&SessionResult::typing(SessionKind::Test, 40, 95))
            .unwrap();
        store
            .save(&SessionResult::typing(SessionKind::Practice, 35, 100))
            .unwrap();
        store
            .save(&SessionResult::game(Difficulty::Hard, 22, 180))
            .unwrap();
    }

    let store = SessionStore::open(&path).unwrap();
    let records = store.get_all().unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].kind, SessionKind::Test);
    assert_eq!(records[0].score, Score::Accuracy(95));
    assert_eq!(records[2].kind, SessionKind::Game(Difficulty::Hard));
    assert_eq!(records[2].score, Score::Points(180));
    assert!(records.windows(2).all(|w| w[0].id < w[1].id));

    let newest = newest_first(&records);
    assert_eq!(newest[0].kind, SessionKind::Game(Difficulty::Hard));
}

#[test]
fn high_score_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.db");

    {
        let store = SessionStore::open(&path).unwrap();
        assert_eq!(store.high_score().unwrap(), 0);
        assert!(store.record_high_score(150).unwrap());
        assert!(!store.record_high_score(90).unwrap());
    }

    let store = SessionStore::open(&path).unwrap();
    assert_eq!(store.high_score().unwrap(), 150);
    assert!(store.record_high_score(151).unwrap());
    assert_eq!(store.high_score().unwrap(), 151);
}

#[test]
fn profile_figures_from_stored_history() {
    let store = SessionStore::in_memory().unwrap();
    for wpm in [30, 50, 70] {
        store
            .save(&SessionResult::typing(SessionKind::Test, wpm, 100))
            .unwrap();
    }

    let records = store.get_all().unwrap();
    let summary = summarize(&records).unwrap();
    assert_eq!(summary.sessions, 3);
    assert_eq!(summary.best_wpm, 70);
    assert_eq!(summary.average_wpm, 50.0);

    let (points, max_wpm) = graph_points(&records).unwrap();
    assert_eq!(points, vec![(0.0, 30.0), (1.0, 50.0), (2.0, 70.0)]);
    assert_eq!(max_wpm, 80.0);
}

#[test]
fn csv_export_lists_every_session() {
    let store = SessionStore::in_memory().unwrap();
    store
        .save(&SessionResult::typing(SessionKind::Test, 61, 97))
        .unwrap();
    store
        .save(&SessionResult::game(Difficulty::Easy, 12, 60))
        .unwrap();

    let mut out = Vec::new();
    assert_eq!(store.export_csv(&mut out).unwrap(), 2);

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "id,kind,wpm,accuracy,score,timestamp");
    assert!(lines[1].starts_with("1,Test,61,97,,"));
    assert!(lines[2].starts_with("2,Game (easy),12,,60,"));
}
