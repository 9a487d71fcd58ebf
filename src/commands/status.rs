use anyhow::{bail, Result};

use crate::escalation::{self, FlagReason, RowActions, ESCALATE_REASON};
use crate::models::{Issue, Official};
use crate::session::Session;

/// The issue as the official's dashboard shows it, provided they may act on it.
fn actionable(session: &Session, id: &str) -> Result<(Official, Issue, bool)> {
    let official = session.official()?.clone();
    let issues = session.db.list_issues()?;
    let visible = escalation::dashboard_view(&issues, &official, session.now());

    let issue = match visible.into_iter().find(|i| i.id == id) {
        Some(i) => i,
        None => bail!("Issue {} not found", id),
    };

    match escalation::row_actions(&official, &issue) {
        RowActions::Completed => bail!("Issue {} is already resolved", id),
        RowActions::NoActionRequired => bail!(
            "Issue {} is at {} level; no action required from {}",
            id,
            issue.current_level,
            official.designation
        ),
        RowActions::Available { can_escalate } => Ok((official, issue, can_escalate)),
    }
}

fn store(session: &Session, issue: &Issue) -> Result<()> {
    if !session.db.replace_issue(issue)? {
        bail!("Issue {} not found", issue.id);
    }
    Ok(())
}

pub fn resolve(session: &Session, id: &str) -> Result<()> {
    let (official, issue, _) = actionable(session, id)?;
    store(session, &escalation::resolve(&issue))?;
    tracing::info!(issue = %id, by = %official.designation, "issue resolved");
    println!("Issue {} marked as Resolved.", id);
    Ok(())
}

pub fn flag(session: &Session, id: &str, reason: FlagReason) -> Result<()> {
    let (official, issue, _) = actionable(session, id)?;
    let flagged = escalation::flag_for_escalation(&issue, reason, official.designation);
    store(session, &flagged)?;
    tracing::info!(issue = %id, %reason, "issue flagged for escalation");
    println!("Issue {}: {}", id, flagged.status);
    Ok(())
}

pub fn escalate(session: &Session, id: &str) -> Result<()> {
    let (official, issue, can_escalate) = actionable(session, id)?;
    if !can_escalate {
        println!("No level above {} to escalate to.", official.designation);
        return Ok(());
    }

    match escalation::escalate_now(&issue, ESCALATE_REASON, official.designation, session.now()) {
        Some(escalated) => {
            store(session, &escalated)?;
            tracing::info!(
                issue = %id,
                from = %issue.current_level,
                to = %escalated.current_level,
                "issue escalated"
            );
            println!("Issue {} escalated to {}.", id, escalated.current_level);
        }
        None => println!("No level above {} to escalate to.", issue.current_level),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Department, Designation, Flag};
    use crate::session::test_support::{as_official, offline_session};
    use chrono::{Duration, Utc};

    fn official_session(designation: Designation, department: Department) -> Session {
        let mut session = offline_session(Utc::now());
        as_official(&mut session, designation, department);
        session
    }

    #[test]
    fn test_resolve_at_own_level() {
        let session = official_session(Designation::Ward, Department::Sanitation);
        resolve(&session, "user-836000").unwrap();

        let issue = session.db.get_issue("user-836000").unwrap().unwrap();
        assert_eq!(issue.status, "Resolved");
        assert_eq!(issue.flag, Flag::Green);
    }

    #[test]
    fn test_resolved_issue_is_terminal() {
        let session = official_session(Designation::Ward, Department::Sanitation);
        resolve(&session, "user-836000").unwrap();

        let result = flag(&session, "user-836000", FlagReason::Time);
        assert!(result.unwrap_err().to_string().contains("already resolved"));
    }

    #[test]
    fn test_cannot_act_below_own_level() {
        // A City official sees Ward issues in their department but may not act on them.
        let session = official_session(Designation::City, Department::Sanitation);
        let result = resolve(&session, "user-836000");
        assert!(result.unwrap_err().to_string().contains("no action required"));
        let issue = session.db.get_issue("user-836000").unwrap().unwrap();
        assert_eq!(issue.status, "New at Ward");
    }

    #[test]
    fn test_cannot_see_other_department() {
        let session = official_session(Designation::Ias, Department::Water);
        let result = resolve(&session, "user-836000");
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_flag_keeps_level() {
        let session = official_session(Designation::Zone, Department::Water);
        flag(&session, "user-123456", FlagReason::Budget).unwrap();

        let issue = session.db.get_issue("user-123456").unwrap().unwrap();
        assert_eq!(issue.status, "Flagged for Budget Escalation at Zone");
        assert_eq!(issue.current_level, Designation::Zone);
        assert_eq!(issue.flag, Flag::None);
    }

    #[test]
    fn test_escalate_moves_one_level() {
        let session = official_session(Designation::City, Department::Road);
        escalate(&session, "user-789012").unwrap();

        let issue = session.db.get_issue("user-789012").unwrap().unwrap();
        assert_eq!(issue.current_level, Designation::Ias);
        assert_eq!(issue.status, "Not Possible from City");
        assert_eq!(issue.flag, Flag::Red);
        assert!(issue.due_date > session.now() + Duration::days(9));
    }

    #[test]
    fn test_escalate_at_ias_changes_nothing() {
        let session = official_session(Designation::City, Department::Road);
        escalate(&session, "user-789012").unwrap();
        let before = session.db.get_issue("user-789012").unwrap().unwrap();

        let mut session = session;
        session.sign_out();
        as_official(&mut session, Designation::Ias, Department::Road);
        escalate(&session, "user-789012").unwrap();

        let after = session.db.get_issue("user-789012").unwrap().unwrap();
        assert_eq!(after, before);
    }

    #[test]
    fn test_action_on_swept_issue_commits_sweep() {
        // The seeded pothole is overdue at Ward, so the Zone official sees it at Zone.
        let session = official_session(Designation::Zone, Department::Road);
        resolve(&session, "user-922400").unwrap();

        let issue = session.db.get_issue("user-922400").unwrap().unwrap();
        assert_eq!(issue.current_level, Designation::Zone);
        assert_eq!(issue.status, "Resolved");
        assert_eq!(issue.flag, Flag::Green);
    }

    #[test]
    fn test_escalate_starts_from_swept_level() {
        let session = official_session(Designation::Zone, Department::Road);
        escalate(&session, "user-922400").unwrap();

        let issue = session.db.get_issue("user-922400").unwrap().unwrap();
        assert_eq!(issue.current_level, Designation::City);
        assert_eq!(issue.status, "Not Possible from Zone");
    }

    #[test]
    fn test_ward_official_loses_overdue_issue() {
        let session = official_session(Designation::Ward, Department::Road);
        let result = resolve(&session, "user-922400");
        assert!(result.unwrap_err().to_string().contains("not found"));
    }
}
