use anyhow::{bail, Result};

use crate::areas::{self, Coordinates};
use crate::capture;
use crate::session::Session;
use crate::submission::{self, IssueCategory, IssueDraft, RoadSubtype};

/// Report form fields as typed on the command line.
#[derive(Debug, Clone, Default)]
pub struct ReportInput {
    pub issue_type: Option<IssueCategory>,
    pub subtype: RoadSubtype,
    pub photo: Option<String>,
    pub area: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub position: Option<Coordinates>,
    /// Reverse-geocode `position` to fill in address and area.
    pub locate: bool,
}

fn draft_from(session: &Session, input: &ReportInput) -> Result<IssueDraft> {
    let image = match input.photo.as_deref() {
        Some(photo) => Some(capture::photo_reference(photo)?),
        None => None,
    };

    let mut area = input.area.clone();
    let mut address = input.address.clone().unwrap_or_default();

    if input.locate {
        if let Some(pos) = input.position {
            let found = session.geocoder.lookup(pos.lat, pos.lng);
            println!("Address: {}", found.address);
            if address.is_empty() {
                address = found.address;
            }
            if area.is_none() {
                area = found.area;
            }
        } else {
            println!("No coordinates given; skipping address lookup.");
        }
    }

    Ok(IssueDraft {
        category: input.issue_type,
        subtype: input.subtype,
        image,
        area,
        address,
        description: input.description.clone().unwrap_or_default(),
        device_position: input.position,
    })
}

pub fn run(session: &Session, input: &ReportInput) -> Result<String> {
    session.citizen()?;

    if let Some(pos) = input.position {
        if !pos.is_valid() {
            bail!("Coordinates out of range: {}, {}", pos.lat, pos.lng);
        }
    }

    let draft = draft_from(session, input)?;
    let mut now = session.now();
    let mut issue = submission::build_issue(&draft, now)?;

    // Ids come from the millisecond clock; step past any id already taken.
    while session.db.get_issue(&issue.id)?.is_some() {
        now += chrono::Duration::milliseconds(1);
        issue.id = submission::issue_id_for(now);
    }

    session.db.insert_issue(&issue)?;
    tracing::info!(
        issue = %issue.id,
        department = %issue.department,
        "issue submitted"
    );
    println!("Issue ({}) submitted successfully!", issue.id);
    Ok(issue.id)
}

pub fn list_areas() -> Result<()> {
    for name in areas::sorted_names() {
        println!("  {}", name);
    }
    Ok(())
}
