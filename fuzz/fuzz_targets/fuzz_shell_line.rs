#![no_main]

//! Fuzz target for the session shell.
//!
//! Feeds arbitrary lines through the tokenizer, clap parsing and command
//! dispatch against a seeded session. Any panic is a bug: every bad line must
//! come back as an error the shell can print.

use std::time::Duration;

use arbitrary::Arbitrary;
use chrono::{TimeZone, Utc};
use libfuzzer_sys::fuzz_target;

use civic_reporter::geocode::GeocoderConfig;
use civic_reporter::session::Session;
use civic_reporter::shell;

#[derive(Arbitrary, Debug)]
struct ShellInput {
    /// Log in first so role-gated commands reach their handlers
    role: Role,
    /// Lines typed after login
    lines: Vec<String>,
}

#[derive(Arbitrary, Debug)]
enum Role {
    Nobody,
    Citizen,
    Official,
}

fuzz_target!(|input: ShellInput| {
    let config = GeocoderConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout: Duration::from_millis(50),
        ..GeocoderConfig::default()
    };
    let Some(now) = Utc.with_ymd_and_hms(2026, 1, 15, 8, 0, 0).single() else {
        return;
    };
    let mut session = match Session::new(&config, Some(now)) {
        Ok(s) => s,
        Err(_) => return,
    };

    let login = match input.role {
        Role::Nobody => None,
        Role::Citizen => Some("login citizen --email user@demo.com --password password123"),
        Role::Official => Some(
            "login official --name F --email f@x --designation Zone --department Road",
        ),
    };
    if let Some(line) = login {
        let _ = shell::execute_line(&mut session, line);
    }

    // Limit to reasonable number of lines
    for line in input.lines.iter().take(16) {
        // Tokenizing alone must never panic
        let _ = shell::split_line(line);
        if let Ok(shell::Flow::Quit) = shell::execute_line(&mut session, line) {
            break;
        }
    }

    // The store must still answer after whatever the lines did
    assert!(session.db.list_issues().is_ok());
});
