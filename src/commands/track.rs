use anyhow::Result;

use crate::session::Session;
use crate::track::{self, TrackResult};

fn step(done: bool, title: &str, detail: &str) {
    let mark = if done { "✓" } else { " " };
    println!("[{}] {}", mark, title);
    println!("      {}", detail);
}

pub fn run(session: &Session, query: Option<&str>) -> Result<()> {
    session.citizen()?;

    match track::track(&session.db, query.unwrap_or(""))? {
        TrackResult::NoQuery => {
            println!("Enter your Issue ID: track <id>");
        }
        TrackResult::NotFound(_) => {
            println!("Invalid Issue ID. Please try again.");
        }
        TrackResult::Found(tracked) => {
            step(
                tracked.submitted(),
                "Issue Submitted",
                &format!(
                    "Received on {} for \"{}\".",
                    tracked.issue.date, tracked.issue.issue_type
                ),
            );
            step(
                tracked.in_progress(),
                "Work in Progress",
                "The issue is being addressed by the department.",
            );
            step(
                tracked.resolved(),
                "Resolved",
                "The issue has been marked as resolved.",
            );
        }
    }

    Ok(())
}
