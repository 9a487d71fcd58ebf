use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Utc};

use crate::escalation;
use crate::session::Session;

fn check_range(now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    if !escalation::supports_clock(now) {
        bail!("Clock must stay between 1970 and late December 9999 (got {})", now.to_rfc3339());
    }
    Ok(now)
}

/// Show the session clock, or move it: `--advance-days` is relative, `--set` takes RFC 3339.
pub fn run(session: &mut Session, advance_days: Option<i64>, set: Option<&str>) -> Result<()> {
    match (advance_days, set) {
        (Some(_), Some(_)) => bail!("Use either --advance-days or --set, not both"),
        (Some(days), None) => {
            let moved = Duration::try_days(days).and_then(|d| session.now().checked_add_signed(d));
            let Some(now) = moved else {
                bail!("Cannot move the clock by {} days", days);
            };
            let now = check_range(now)?;
            session.set_now(now);
            tracing::info!(%now, "clock moved");
        }
        (None, Some(raw)) => {
            let now = match DateTime::parse_from_rfc3339(raw) {
                Ok(dt) => dt.with_timezone(&Utc),
                Err(e) => bail!("Invalid time '{}': {}", raw, e),
            };
            let now = check_range(now)?;
            session.set_now(now);
            tracing::info!(%now, "clock set");
        }
        (None, None) => {}
    }

    println!("Clock: {}", session.now().to_rfc3339());
    Ok(())
}
