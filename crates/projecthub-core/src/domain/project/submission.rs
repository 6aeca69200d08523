//! Project submission: the record a new-project form produces

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{Category, Location, RawDuration, RawProjectRecord, START_DATE_FORMAT};
use crate::domain::identity::Identity;
use crate::error::{Error, Result};

/// Fields filled in when submitting a new project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectSubmission {
    pub project_name: String,
    pub project_description: String,
    pub category: String,
    pub location: String,
    pub start_date: Option<String>,
    pub duration: Option<String>,
    pub project_image: Option<String>,
}

impl ProjectSubmission {
    /// Check the required fields and the closed enums
    pub fn validate(&self) -> Result<(Category, Location)> {
        let missing: Vec<&str> = [
            ("project name", &self.project_name),
            ("project description", &self.project_description),
            ("category", &self.category),
            ("location", &self.location),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(Error::InvalidInput(format!(
                "please fill in all required fields (missing: {})",
                missing.join(", ")
            )));
        }

        if let Some(start) = self.start_date.as_deref().filter(|s| !s.trim().is_empty()) {
            NaiveDate::parse_from_str(start.trim(), START_DATE_FORMAT).map_err(|_| {
                Error::InvalidInput(format!("start date '{}' is not YYYY-MM-DD", start))
            })?;
        }

        if let Some(duration) = self.duration.as_deref().filter(|s| !s.trim().is_empty()) {
            let months: u32 = duration.trim().parse().map_err(|_| {
                Error::InvalidInput(format!("duration '{}' is not a whole number of months", duration))
            })?;
            if months == 0 {
                return Err(Error::InvalidInput("duration must be at least 1 month".to_string()));
            }
        }

        Ok((self.category.parse()?, self.location.parse()?))
    }

    /// Build the record handed to the store. The creator, when signed in,
    /// becomes the sole (and owning) contributor.
    pub fn into_record(
        self,
        creator: Option<&Identity>,
        created_at: DateTime<Utc>,
    ) -> Result<RawProjectRecord> {
        let (category, location) = self.validate()?;

        Ok(RawProjectRecord {
            id: String::new(),
            project_name: Some(self.project_name.trim().to_string()),
            project_description: Some(self.project_description.trim().to_string()),
            category: Some(category.as_str().to_string()),
            location: Some(location.as_str().to_string()),
            start_date: self.start_date.filter(|s| !s.trim().is_empty()),
            duration: self
                .duration
                .filter(|s| !s.trim().is_empty())
                .map(|s| RawDuration::Text(s.trim().to_string())),
            contributors: Some(creator.map(|c| vec![c.id.clone()]).unwrap_or_default()),
            project_image: self.project_image.filter(|s| !s.trim().is_empty()),
            created_at: Some(created_at.to_rfc3339()),
        })
    }
}
