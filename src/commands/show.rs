use anyhow::{bail, Result};

use crate::capture;
use crate::escalation::ProgressStage;
use crate::session::Session;

/// Full record of one issue, including its photo reference.
pub fn run(session: &Session, id: &str) -> Result<()> {
    session.citizen()?;
    let issue = match session.db.get_issue(id)? {
        Some(i) => i,
        None => bail!("Issue {} not found", id),
    };

    println!("Issue {}: {}", issue.id, issue.issue_type);
    println!("Location: {}", issue.location);
    println!("Reported: {}", issue.date);
    println!("Status: {} [{}]", issue.status, ProgressStage::from_status(&issue.status).label());
    println!("Photo: {}", capture::describe(&issue.image));

    if !issue.description.is_empty() {
        println!("\nDescription:");
        for line in issue.description.lines() {
            println!("  {}", line);
        }
    }

    Ok(())
}
