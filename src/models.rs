use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Administrative levels, lowest first. Escalation moves towards the end.
pub const HIERARCHY: [Designation; 4] = [
    Designation::Ward,
    Designation::Zone,
    Designation::City,
    Designation::Ias,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Designation {
    Ward,
    Zone,
    City,
    #[serde(rename = "IAS")]
    Ias,
}

impl Designation {
    pub fn as_str(self) -> &'static str {
        match self {
            Designation::Ward => "Ward",
            Designation::Zone => "Zone",
            Designation::City => "City",
            Designation::Ias => "IAS",
        }
    }

    /// Position in [`HIERARCHY`].
    pub fn index(self) -> usize {
        match self {
            Designation::Ward => 0,
            Designation::Zone => 1,
            Designation::City => 2,
            Designation::Ias => 3,
        }
    }

    /// The level above this one, or `None` at the top of the hierarchy.
    pub fn next(self) -> Option<Designation> {
        HIERARCHY.get(self.index() + 1).copied()
    }

    pub fn is_top(self) -> bool {
        self.next().is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    Road,
    Sanitation,
    Water,
}

pub const DEPARTMENTS: [Department; 3] =
    [Department::Road, Department::Sanitation, Department::Water];

impl Department {
    pub fn as_str(self) -> &'static str {
        match self {
            Department::Road => "Road",
            Department::Sanitation => "Sanitation",
            Department::Water => "Water",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Flag {
    #[default]
    None,
    Red,
    Green,
}

impl Flag {
    pub fn as_str(self) -> &'static str {
        match self {
            Flag::None => "None",
            Flag::Red => "Red",
            Flag::Green => "Green",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Flag::None => "⚪",
            Flag::Red => "🚩",
            Flag::Green => "✅",
        }
    }
}

macro_rules! impl_wire_name {
    ($ty:ident, $label:literal, [$($variant:expr),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                [$($variant),+]
                    .into_iter()
                    .find(|v: &$ty| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| {
                        let names: Vec<&str> = [$($variant),+].iter().map(|v: &$ty| v.as_str()).collect();
                        format!("Invalid {} '{}'. Must be one of: {}", $label, s, names.join(", "))
                    })
            }
        }
    };
}

impl_wire_name!(
    Designation,
    "designation",
    [Designation::Ward, Designation::Zone, Designation::City, Designation::Ias]
);
impl_wire_name!(
    Department,
    "department",
    [Department::Road, Department::Sanitation, Department::Water]
);
impl_wire_name!(Flag, "flag", [Flag::None, Flag::Red, Flag::Green]);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    /// Submission day as `YYYY-MM-DD`.
    pub date: String,
    pub issue_type: String,
    pub location: String,
    pub status: String,
    pub current_level: Designation,
    pub department: Department,
    pub due_date: DateTime<Utc>,
    pub flag: Flag,
    /// Data URL or remote URL.
    pub image: String,
    pub description: String,
}

impl Issue {
    pub fn is_resolved(&self) -> bool {
        self.status == STATUS_RESOLVED
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        now > self.due_date
    }
}

pub const STATUS_RESOLVED: &str = "Resolved";
pub const STATUS_NEW: &str = "New at Ward";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citizen {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Official {
    pub name: String,
    pub email: String,
    pub designation: Designation,
    pub department: Department,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum User {
    Citizen(Citizen),
    Official(Official),
}

impl User {
    pub fn name(&self) -> &str {
        match self {
            User::Citizen(c) => &c.name,
            User::Official(o) => &o.name,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            User::Citizen(c) => &c.email,
            User::Official(o) => &o.email,
        }
    }
}
