use anyhow::{bail, Result};
use chrono::{DateTime, Utc};

use crate::db::Database;
use crate::geocode::{GeocoderConfig, ReverseGeocoder};
use crate::models::{Citizen, Official, User};

/// Everything one sitting at the terminal can see and change: the issue list,
/// who is logged in, and the clock the rules are evaluated against.
pub struct Session {
    pub db: Database,
    pub geocoder: ReverseGeocoder,
    user: Option<User>,
    fixed_now: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(geocoder: &GeocoderConfig, fixed_now: Option<DateTime<Utc>>) -> Result<Self> {
        let now = fixed_now.unwrap_or_else(Utc::now);
        Ok(Session {
            db: Database::seeded(now)?,
            geocoder: ReverseGeocoder::new(geocoder)?,
            user: None,
            fixed_now,
        })
    }

    /// Wall-clock time unless the session was started with a pinned clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }

    pub fn set_now(&mut self, now: DateTime<Utc>) {
        self.fixed_now = Some(now);
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn sign_in(&mut self, user: User) {
        tracing::info!(email = user.email(), "signed in");
        self.user = Some(user);
    }

    pub fn sign_out(&mut self) -> Option<User> {
        let user = self.user.take();
        if let Some(u) = &user {
            tracing::info!(email = u.email(), "signed out");
        }
        user
    }

    pub fn citizen(&self) -> Result<&Citizen> {
        match &self.user {
            Some(User::Citizen(c)) => Ok(c),
            Some(User::Official(_)) => bail!("This is a citizen command. Log out and log in as a citizen."),
            None => bail!("Not logged in. Use 'login citizen' first."),
        }
    }

    pub fn official(&self) -> Result<&Official> {
        match &self.user {
            Some(User::Official(o)) => Ok(o),
            Some(User::Citizen(_)) => bail!("This is an official command. Log out and log in as an official."),
            None => bail!("Not logged in. Use 'login official' first."),
        }
    }
}
