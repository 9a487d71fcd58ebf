use anyhow::{bail, Result};

use crate::session::Session;

/// Citizen edit form: replace type, location and/or description.
pub fn run(
    session: &Session,
    id: &str,
    issue_type: Option<&str>,
    location: Option<&str>,
    description: Option<&str>,
) -> Result<()> {
    session.citizen()?;

    if issue_type.is_none() && location.is_none() && description.is_none() {
        bail!("Nothing to update. Use --type, --location, or --description");
    }

    if session
        .db
        .update_details(id, issue_type, location, description)?
    {
        tracing::info!(issue = %id, "issue details edited");
        println!("Issue updated successfully!");
    } else {
        bail!("Issue {} not found", id);
    }

    Ok(())
}
