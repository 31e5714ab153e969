use assert_cmd::Command;
use tempfile::tempdir;
use typemaster::session::{SessionKind, SessionResult};
use typemaster::store::SessionStore;

fn typemaster() -> Command {
    Command::cargo_bin("typemaster").unwrap()
}

#[test]
fn help_lists_flags() {
    let output = typemaster()
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .clone();
    let help = String::from_utf8(output.stdout).unwrap();

    for flag in [
        "--duration",
        "--difficulty",
        "--game-difficulty",
        "--view",
        "--db",
        "--export",
    ] {
        assert!(help.contains(flag), "{flag} missing from help");
    }
}

#[test]
fn export_writes_csv_without_a_tty() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("history.db");
    let out = dir.path().join("history.csv");
    {
        let store = SessionStore::open(&db).unwrap();
        store
            .save(&SessionResult::typing(SessionKind::Test, 48, 99))
            .unwrap();
    }

    typemaster()
        .arg("--db")
        .arg(&db)
        .arg("--export")
        .arg(&out)
        .assert()
        .success();

    let csv = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "id,kind,wpm,accuracy,score,timestamp");
    assert!(lines[1].starts_with("1,Test,48,99,,"));
}

#[test]
fn export_to_stdout() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("history.db");

    let output = typemaster()
        .arg("--db")
        .arg(&db)
        .args(["--export", "-"])
        .assert()
        .success()
        .get_output()
        .clone();

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.is_empty() || stdout.starts_with("id,kind"));
}

#[test]
fn refuses_to_start_without_a_tty() {
    let dir = tempdir().unwrap();
    let output = typemaster()
        .arg("--db")
        .arg(dir.path().join("history.db"))
        .assert()
        .failure()
        .get_output()
        .clone();

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("stdin must be a tty"));
}

#[test]
fn rejects_unsupported_duration() {
    typemaster().args(["--duration", "45"]).assert().failure();
}
