//! Visakhapatnam locality gazetteer and the demo issues every session starts with.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::{Department, Designation, Flag, Issue};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Finite latitude in [-90, 90] and longitude in [-180, 180].
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Map centre, also the fallback position for areas missing from [`AREAS`].
pub const DEFAULT_CENTER: Coordinates = Coordinates { lat: 17.72, lng: 83.3 };

pub const AREAS: [(&str, Coordinates); 19] = [
    ("Akkayyapalem", Coordinates { lat: 17.73, lng: 83.30 }),
    ("Allipuram", Coordinates { lat: 17.70, lng: 83.28 }),
    ("Anakapalle", Coordinates { lat: 17.68, lng: 83.01 }),
    ("Arilova", Coordinates { lat: 17.76, lng: 83.32 }),
    ("Asilmetta", Coordinates { lat: 17.72, lng: 83.31 }),
    ("Bheemunipatnam (Bheemili)", Coordinates { lat: 17.88, lng: 83.45 }),
    ("Chinna Waltair", Coordinates { lat: 17.74, lng: 83.33 }),
    ("Dwaraka Nagar", Coordinates { lat: 17.72, lng: 83.30 }),
    ("Gajuwaka", Coordinates { lat: 17.67, lng: 83.21 }),
    ("Gopalapatnam", Coordinates { lat: 17.75, lng: 83.25 }),
    ("Jagadamba Centre", Coordinates { lat: 17.70, lng: 83.29 }),
    ("Kancharapalem", Coordinates { lat: 17.73, lng: 83.28 }),
    ("Maddilapalem", Coordinates { lat: 17.73, lng: 83.32 }),
    ("Madhurawada", Coordinates { lat: 17.82, lng: 83.34 }),
    ("MVP Colony", Coordinates { lat: 17.74, lng: 83.32 }),
    ("Pendurthi", Coordinates { lat: 17.82, lng: 83.22 }),
    ("RK Beach", Coordinates { lat: 17.71, lng: 83.32 }),
    ("Seethammadhara", Coordinates { lat: 17.74, lng: 83.31 }),
    ("Siripuram", Coordinates { lat: 17.72, lng: 83.32 }),
];

pub fn lookup(area: &str) -> Option<Coordinates> {
    AREAS
        .iter()
        .find(|(name, _)| *name == area)
        .map(|(_, coords)| *coords)
}

pub fn is_known(area: &str) -> bool {
    lookup(area).is_some()
}

/// Area names in alphabetical order, as offered by the report form.
pub fn sorted_names() -> Vec<&'static str> {
    let mut names: Vec<&str> = AREAS.iter().map(|(name, _)| *name).collect();
    names.sort_unstable();
    names
}

fn days_from(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now + Duration::days(days)
}

/// Demo issues in display order. Due dates other than the first are relative to `now`.
pub fn initial_issues(now: DateTime<Utc>) -> Vec<Issue> {
    let fixed_due = NaiveDate::from_ymd_opt(2025, 9, 20)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or(now);

    vec![
        Issue {
            id: "user-922400".to_string(),
            lat: 17.7388,
            lng: 83.3151,
            date: "2025-09-10".to_string(),
            issue_type: "Road Issue - Pothole".to_string(),
            location: "MVP Colony".to_string(),
            status: "New at Ward".to_string(),
            current_level: Designation::Ward,
            department: Department::Road,
            due_date: fixed_due,
            flag: Flag::None,
            image: "https://picsum.photos/seed/pothole/600/400".to_string(),
            description: "Large pothole causing traffic issues.".to_string(),
        },
        Issue {
            id: "user-836000".to_string(),
            lat: 17.6868,
            lng: 83.2185,
            date: "2025-09-18".to_string(),
            issue_type: "Sanitation".to_string(),
            location: "Gajuwaka".to_string(),
            status: "New at Ward".to_string(),
            current_level: Designation::Ward,
            department: Department::Sanitation,
            due_date: days_from(now, 5),
            flag: Flag::None,
            image: "https://picsum.photos/seed/garbage/600/400".to_string(),
            description: "Garbage bin overflowing for days.".to_string(),
        },
        Issue {
            id: "user-123456".to_string(),
            lat: 17.7289,
            lng: 83.3222,
            date: "2025-09-15".to_string(),
            issue_type: "Water".to_string(),
            location: "Siripuram".to_string(),
            status: "Escalated from Ward".to_string(),
            current_level: Designation::Zone,
            department: Department::Water,
            due_date: days_from(now, 8),
            flag: Flag::None,
            image: "https://picsum.photos/seed/pipe/600/400".to_string(),
            description: "Major pipeline burst.".to_string(),
        },
        Issue {
            id: "user-789012".to_string(),
            lat: 17.7126,
            lng: 83.3235,
            date: "2025-09-01".to_string(),
            issue_type: "Road Issue - Streetlight".to_string(),
            location: "RK Beach".to_string(),
            status: "Acknowledged by City".to_string(),
            current_level: Designation::City,
            department: Department::Road,
            due_date: days_from(now, 3),
            flag: Flag::None,
            image: "https://picsum.photos/seed/light/600/400".to_string(),
            description: "Entire stretch of lights not working.".to_string(),
        },
    ]
}
