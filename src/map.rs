//! Marker data for the external map widget.

use serde::Serialize;
use serde_json::{json, Value};

use crate::areas::DEFAULT_CENTER;
use crate::models::{Department, Issue, DEPARTMENTS};

pub const DEFAULT_ZOOM: u8 = 12;
pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str = "© OpenStreetMap contributors";

pub fn department_color(department: Department) -> &'static str {
    match department {
        Department::Road => "#E74C3C",
        Department::Sanitation => "#F1C40F",
        Department::Water => "#3498DB",
    }
}

pub fn color_name(department: Department) -> &'static str {
    match department {
        Department::Road => "red",
        Department::Sanitation => "yellow",
        Department::Water => "blue",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub department: Department,
    #[serde(rename = "type")]
    pub issue_type: String,
    pub location: String,
    pub status: String,
    pub color: &'static str,
}

impl MapMarker {
    pub fn from_issue(issue: &Issue) -> Self {
        MapMarker {
            id: issue.id.clone(),
            lat: issue.lat,
            lng: issue.lng,
            department: issue.department,
            issue_type: issue.issue_type.clone(),
            location: issue.location.clone(),
            status: issue.status.clone(),
            color: department_color(issue.department),
        }
    }

    pub fn popup(&self) -> String {
        format!(
            "ID: {}\nType: {}\nLocation: {}\nStatus: {}",
            self.id, self.issue_type, self.location, self.status
        )
    }
}

/// Markers for every unresolved issue, in list order.
pub fn unresolved_markers(issues: &[Issue]) -> Vec<MapMarker> {
    issues
        .iter()
        .filter(|issue| !issue.is_resolved())
        .map(MapMarker::from_issue)
        .collect()
}

pub fn legend() -> Vec<(Department, &'static str)> {
    DEPARTMENTS
        .iter()
        .map(|d| (*d, department_color(*d)))
        .collect()
}

/// GeoJSON `FeatureCollection` of the markers. Coordinates are `[lng, lat]` per RFC 7946.
pub fn to_geojson(markers: &[MapMarker]) -> Value {
    let features: Vec<Value> = markers
        .iter()
        .map(|m| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [m.lng, m.lat],
                },
                "properties": {
                    "id": m.id,
                    "department": m.department,
                    "type": m.issue_type,
                    "location": m.location,
                    "status": m.status,
                    "marker-color": m.color,
                    "popup": m.popup(),
                },
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "center": [DEFAULT_CENTER.lng, DEFAULT_CENTER.lat],
        "zoom": DEFAULT_ZOOM,
        "tiles": { "url": TILE_URL, "attribution": TILE_ATTRIBUTION },
        "features": features,
    })
}
