use anyhow::Result;

use crate::db::Database;
use crate::escalation::ProgressStage;
use crate::models::Issue;

/// Result of the "Where is my issue?" lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackResult {
    /// Nothing entered yet.
    NoQuery,
    NotFound(String),
    Found(TrackedIssue),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackedIssue {
    pub issue: Issue,
    pub stage: ProgressStage,
}

impl TrackedIssue {
    pub fn new(issue: Issue) -> Self {
        let stage = ProgressStage::from_status(&issue.status);
        TrackedIssue { issue, stage }
    }

    pub fn submitted(&self) -> bool {
        true
    }

    pub fn in_progress(&self) -> bool {
        matches!(self.stage, ProgressStage::InProgress | ProgressStage::Resolved)
    }

    pub fn resolved(&self) -> bool {
        self.stage == ProgressStage::Resolved
    }
}

pub fn track(db: &Database, query: &str) -> Result<TrackResult> {
    let id = query.trim();
    if id.is_empty() {
        return Ok(TrackResult::NoQuery);
    }
    Ok(match db.get_issue(id)? {
        Some(issue) => TrackResult::Found(TrackedIssue::new(issue)),
        None => TrackResult::NotFound(id.to_string()),
    })
}
