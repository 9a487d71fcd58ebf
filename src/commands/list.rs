use anyhow::Result;

use crate::commands::truncate;
use crate::escalation::ProgressStage;
use crate::session::Session;

/// Citizen profile: user details and the reported-issues table.
pub fn run(session: &Session) -> Result<()> {
    let citizen = session.citizen()?;
    let issues = session.db.list_issues()?;

    println!("Name:  {}", citizen.name);
    println!("Email: {}", citizen.email);
    println!("Member Since: 2024-01-01");
    println!();

    if issues.is_empty() {
        println!("No issues reported yet.");
        return Ok(());
    }

    println!(
        "{:<12} {:<10} {:<26} {:<30} {}",
        "ID", "Date", "Issue Type", "Location", "Status"
    );
    for issue in issues {
        let stage = ProgressStage::from_status(&issue.status);
        println!(
            "{:<12} {:<10} {:<26} {:<30} [{}]",
            issue.id,
            issue.date,
            truncate(&issue.issue_type, 26),
            truncate(&issue.location, 30),
            stage.label()
        );
    }

    Ok(())
}
