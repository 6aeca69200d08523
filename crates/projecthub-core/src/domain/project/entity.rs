//! Project entity, its closed enums and the raw store record it is built from

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use super::urgency::{Urgency, parse_duration};
use crate::domain::identity::Identity;
use crate::error::{Error, Result};

/// Date format used by the store for `startDate`
pub const START_DATE_FORMAT: &str = "%Y-%m-%d";

/// Project category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Beach Cleaning")]
    BeachCleaning,
    #[serde(rename = "School Upgrades")]
    SchoolUpgrades,
    #[serde(rename = "Public Resource Development")]
    PublicResourceDevelopment,
}

impl Category {
    /// Every category, in display order
    pub const ALL: [Category; 3] = [
        Self::BeachCleaning,
        Self::SchoolUpgrades,
        Self::PublicResourceDevelopment,
    ];

    /// Display label, also the value stored in records
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BeachCleaning => "Beach Cleaning",
            Self::SchoolUpgrades => "School Upgrades",
            Self::PublicResourceDevelopment => "Public Resource Development",
        }
    }

    /// Parse a label. Case, spaces, dashes and underscores are ignored so
    /// `"beach-cleaning"` and `"BeachCleaning"` both match.
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = normalize_label(s);
        Self::ALL
            .into_iter()
            .find(|c| normalize_label(c.as_str()) == wanted)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| {
            Error::InvalidInput(format!(
                "unknown category '{}' (expected one of: {})",
                s,
                Self::ALL.map(|c| c.as_str()).join(", ")
            ))
        })
    }
}

/// Area code a project takes place in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Location {
    Virar,
    Vasai,
    Naigaon,
    Malad,
    Andheri,
}

impl Location {
    /// Every location, in display order
    pub const ALL: [Location; 5] = [
        Self::Virar,
        Self::Vasai,
        Self::Naigaon,
        Self::Malad,
        Self::Andheri,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Virar => "VIRAR",
            Self::Vasai => "VASAI",
            Self::Naigaon => "NAIGAON",
            Self::Malad => "MALAD",
            Self::Andheri => "ANDHERI",
        }
    }

    /// Parse an area code, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim().to_uppercase();
        Self::ALL.into_iter().find(|l| l.as_str() == wanted)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Location {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| {
            Error::InvalidInput(format!(
                "unknown location '{}' (expected one of: {})",
                s,
                Self::ALL.map(|l| l.as_str()).join(", ")
            ))
        })
    }
}

fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Duration as the store holds it: a number, a string typed into a form, or
/// anything else a hand-edited record may carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDuration {
    Months(i64),
    /// Fractional months are truncated
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawDuration {
    /// Whole months, or `None` when the value is unusable
    pub fn months(&self) -> Option<u32> {
        match self {
            Self::Months(n) => u32::try_from(*n).ok(),
            Self::Number(n) if n.is_finite() && *n >= 0.0 => {
                Some(n.trunc().min(f64::from(u32::MAX)) as u32)
            }
            Self::Number(_) => None,
            Self::Text(s) => parse_duration(s),
            Self::Other(_) => None,
        }
    }
}

/// A project record exactly as the remote store returns it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProjectRecord {
    /// Store-assigned identifier (the document id, not a record field)
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub project_description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub duration: Option<RawDuration>,
    #[serde(default)]
    pub contributors: Option<Vec<String>>,
    #[serde(default)]
    pub project_image: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A community project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Opaque identifier assigned by the store
    pub id: String,
    pub project_name: String,
    pub project_description: String,
    pub category: Category,
    pub location: Location,
    pub start_date: Option<NaiveDate>,
    /// Declared duration in months; `None` when the record held no usable value
    pub duration: Option<u32>,
    /// Identity ids; the first entry is the owner
    pub contributors: Vec<String>,
    pub project_image: Option<String>,
}

impl Project {
    /// Urgency tier, always derived from the current duration
    pub fn urgency(&self) -> Urgency {
        Urgency::for_duration(self.duration)
    }

    /// The creator, by convention the first contributor
    pub fn owner(&self) -> Option<&str> {
        self.contributors.first().map(String::as_str)
    }

    /// Check whether the identity is the project's recorded owner
    pub fn is_owned_by(&self, identity: &Identity) -> bool {
        self.owner() == Some(identity.id.as_str())
    }

    /// Check whether the identity appears anywhere in the contributors list
    pub fn has_contributor(&self, id: &str) -> bool {
        self.contributors.iter().any(|c| c == id)
    }

    /// One-paragraph description shown in the project detail view
    pub fn summary(&self) -> String {
        let start = self
            .start_date
            .map(|d| d.format(START_DATE_FORMAT).to_string())
            .unwrap_or_else(|| "an unscheduled date".to_string());
        let duration = self
            .duration
            .map(|d| d.to_string())
            .unwrap_or_else(|| "an unspecified number of".to_string());

        format!(
            "A {} urgency project starting on {} in {}. This {} initiative will run for {} months, focusing on community development and engagement.",
            self.urgency().as_str().to_lowercase(),
            start,
            self.location,
            self.category.as_str().to_lowercase(),
            duration,
        )
    }
}

impl TryFrom<RawProjectRecord> for Project {
    type Error = Error;

    fn try_from(raw: RawProjectRecord) -> Result<Self> {
        let project_name = raw
            .project_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                Error::InvalidInput(format!("record '{}' has no project name", raw.id))
            })?;

        let category: Category = raw
            .category
            .as_deref()
            .ok_or_else(|| Error::InvalidInput(format!("record '{}' has no category", raw.id)))?
            .parse()?;

        let location: Location = raw
            .location
            .as_deref()
            .ok_or_else(|| Error::InvalidInput(format!("record '{}' has no location", raw.id)))?
            .parse()?;

        let start_date = match raw.start_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => match NaiveDate::parse_from_str(s, START_DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(e) => {
                    warn!(project_id = %raw.id, start_date = %s, error = %e, "Ignoring unparsable start date");
                    None
                }
            },
        };

        let duration = raw.duration.as_ref().and_then(RawDuration::months);
        if duration.is_none() && raw.duration.is_some() {
            warn!(project_id = %raw.id, duration = ?raw.duration, "Unusable duration, classifying as low urgency");
        }

        Ok(Self {
            id: raw.id,
            project_name,
            project_description: raw.project_description.unwrap_or_default(),
            category,
            location,
            start_date,
            duration,
            contributors: raw.contributors.unwrap_or_default(),
            project_image: raw.project_image.filter(|url| !url.trim().is_empty()),
        })
    }
}
