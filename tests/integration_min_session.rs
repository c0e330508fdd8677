// Minimal integration test that drives the compiled binary through a PTY.
// This exercises the real event loop and crossterm input handling without
// relying on internal modules.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Marked Unix-only and ignored by default to avoid CI/platform issues.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn activate_close_and_quit() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let bin = assert_cmd::cargo::cargo_bin("transit-pass");
    let cmd = format!(
        "{} --pass 24-hour --config {} --log-file {}",
        bin.display(),
        dir.path().join("config.json").display(),
        dir.path().join("pass.log").display(),
    );

    let mut p = spawn(cmd)?;

    // Give the app a moment to initialize the terminal/alternate screen
    std::thread::sleep(Duration::from_millis(200));
    p.expect("Activate 24 Hour")?;

    p.send("\r")?; // activate
    p.expect("Show operator your ticket")?;

    p.send("\x1b")?; // close the pass
    std::thread::sleep(Duration::from_millis(200));
    p.send("q")?;

    p.expect(Eof)?;
    Ok(())
}
