use anyhow::Result;

use crate::commands::truncate;
use crate::escalation::{self, RowActions};
use crate::models::Official;
use crate::session::Session;

fn actions_label(actions: RowActions) -> &'static str {
    match actions {
        RowActions::Completed => "Completed",
        RowActions::NoActionRequired => "No action required.",
        RowActions::Available { can_escalate: true } => "resolve | flag time | flag budget | escalate",
        RowActions::Available { can_escalate: false } => "resolve | flag time | flag budget",
    }
}

fn header(official: &Official) {
    println!("Department Issues");
    println!("Showing issues for: {} Department", official.department);
    println!();
}

pub fn run(session: &Session) -> Result<()> {
    let official = session.official()?;
    let issues = session.db.list_issues()?;
    let visible = escalation::dashboard_view(&issues, official, session.now());

    header(official);

    if visible.is_empty() {
        println!("No issues in your department at this time.");
        return Ok(());
    }

    println!(
        "{:<4} {:<12} {:<10} {:<24} {:<36} {}",
        "Flag", "ID", "Due Date", "Location", "Status", "Actions"
    );
    for issue in &visible {
        let actions = escalation::row_actions(official, issue);
        println!(
            "{:<4} {:<12} {:<10} {:<24} {:<36} {}",
            issue.flag.icon(),
            issue.id,
            issue.due_date.format("%Y-%m-%d"),
            truncate(&issue.location, 24),
            truncate(&issue.status, 36),
            actions_label(actions)
        );
    }

    Ok(())
}
