//! Turning a citizen's report form into a new issue.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::areas::{self, Coordinates};
use crate::escalation;
use crate::models::{Department, Designation, Flag, Issue, STATUS_NEW};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueCategory {
    Sanitation,
    RoadIssue,
    Water,
}

impl IssueCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueCategory::Sanitation => "Sanitation",
            IssueCategory::RoadIssue => "Road Issue",
            IssueCategory::Water => "Water",
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sanitation" => Ok(IssueCategory::Sanitation),
            "road issue" | "road" => Ok(IssueCategory::RoadIssue),
            "water" => Ok(IssueCategory::Water),
            _ => Err(format!(
                "Invalid issue type '{}'. Must be one of: Sanitation, Road Issue, Water",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoadSubtype {
    #[default]
    Pothole,
    Streetlight,
    Obstacle,
}

impl RoadSubtype {
    pub fn as_str(self) -> &'static str {
        match self {
            RoadSubtype::Pothole => "Pothole",
            RoadSubtype::Streetlight => "Streetlight",
            RoadSubtype::Obstacle => "Obstacle",
        }
    }
}

impl FromStr for RoadSubtype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pothole" => Ok(RoadSubtype::Pothole),
            "streetlight" => Ok(RoadSubtype::Streetlight),
            "obstacle" => Ok(RoadSubtype::Obstacle),
            _ => Err(format!(
                "Invalid road issue '{}'. Must be one of: Pothole, Streetlight, Obstacle",
                s
            )),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("Please fill all fields and provide a photo.")]
    Incomplete,
}

/// Report form contents as the citizen left them.
#[derive(Debug, Clone, Default)]
pub struct IssueDraft {
    pub category: Option<IssueCategory>,
    pub subtype: RoadSubtype,
    /// Data URL or remote URL of the photo.
    pub image: Option<String>,
    pub area: Option<String>,
    pub address: String,
    pub description: String,
    /// Position reported by the device, if any.
    pub device_position: Option<Coordinates>,
}

pub fn full_issue_type(category: IssueCategory, subtype: RoadSubtype) -> String {
    match category {
        IssueCategory::RoadIssue => format!("{} - {}", category, subtype.as_str()),
        other => other.as_str().to_string(),
    }
}

pub fn department_for(issue_type: &str) -> Department {
    if issue_type.contains("Road") {
        Department::Road
    } else if issue_type == "Sanitation" {
        Department::Sanitation
    } else {
        Department::Water
    }
}

/// `user-` followed by the last six digits of the millisecond clock.
pub fn issue_id_for(now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis().to_string();
    let start = millis.len().saturating_sub(6);
    format!("user-{}", &millis[start..])
}

pub fn build_issue(draft: &IssueDraft, now: DateTime<Utc>) -> Result<Issue, SubmissionError> {
    let (category, area, image) = match (&draft.category, &draft.area, &draft.image) {
        (Some(c), Some(a), Some(i))
            if !a.is_empty() && !i.is_empty() && !draft.description.trim().is_empty() =>
        {
            (*c, a, i)
        }
        _ => return Err(SubmissionError::Incomplete),
    };

    let issue_type = full_issue_type(category, draft.subtype);
    let department = department_for(&issue_type);
    let position = draft
        .device_position
        .or_else(|| areas::lookup(area))
        .unwrap_or(areas::DEFAULT_CENTER);

    Ok(Issue {
        id: issue_id_for(now),
        lat: position.lat,
        lng: position.lng,
        date: now.format("%Y-%m-%d").to_string(),
        issue_type,
        location: format!("{} (Details: {})", area, draft.address),
        status: STATUS_NEW.to_string(),
        current_level: Designation::Ward,
        department,
        due_date: escalation::next_due_date(now),
        flag: Flag::None,
        image: image.clone(),
        description: draft.description.clone(),
    })
}
