// Drives the compiled binary through a PTY to exercise the real event loop
// and crossterm input handling.
//
// Needs a TTY, so it is Unix-only and ignored by default.
// Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn minimal_session_starts_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let bin = assert_cmd::cargo::cargo_bin("typemaster");
    let cmd = format!(
        "{} --duration 15 --db {}",
        bin.display(),
        dir.path().join("history.db").display()
    );

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(200));

    // a few keystrokes start the test, tab leaves it unrecorded
    p.send("th")?;
    std::thread::sleep(Duration::from_millis(100));
    p.send("\t")?;
    std::thread::sleep(Duration::from_millis(100));

    p.send("\x1b")?; // ESC
    p.expect(Eof)?;
    Ok(())
}

#[test]
#[ignore]
fn game_view_opens_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let bin = assert_cmd::cargo::cargo_bin("typemaster");
    let cmd = format!(
        "{} --view game --db {}",
        bin.display(),
        dir.path().join("history.db").display()
    );

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(200));

    p.send("\r")?; // start a round
    std::thread::sleep(Duration::from_millis(300));

    p.send("\x03")?; // ctrl-c
    p.expect(Eof)?;
    Ok(())
}
