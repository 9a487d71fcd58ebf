use anyhow::Result;

use crate::escalation;
use crate::map::{self, MapMarker};
use crate::session::Session;

/// The markers an official's map shows right now: swept, filtered, unresolved.
pub fn markers(session: &Session) -> Result<Vec<MapMarker>> {
    let official = session.official()?;
    let issues = session.db.list_issues()?;
    let visible = escalation::dashboard_view(&issues, official, session.now());
    Ok(map::unresolved_markers(&visible))
}

pub fn run(session: &Session, geojson: bool) -> Result<()> {
    let markers = markers(session)?;

    if geojson {
        println!("{}", serde_json::to_string_pretty(&map::to_geojson(&markers))?);
        return Ok(());
    }

    println!("Legend:");
    for (department, hex) in map::legend() {
        println!("  {:<7} {} ({})", map::color_name(department), hex, department);
    }
    println!();

    if markers.is_empty() {
        println!("No unresolved issues to show on the map.");
        return Ok(());
    }

    for marker in &markers {
        println!(
            "[{}] ({:.4}, {:.4})",
            map::color_name(marker.department),
            marker.lat,
            marker.lng
        );
        for line in marker.popup().lines() {
            println!("    {}", line);
        }
    }

    Ok(())
}
