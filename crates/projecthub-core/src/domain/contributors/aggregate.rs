//! Per-contributor statistics over a fetched project list

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::masking::mask;
use crate::domain::project::Project;

/// What one contributor has worked on within the current result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorSummary {
    /// Raw identity id. Never shown directly; see [`Self::display_id`]
    pub id: String,
    pub project_count: usize,
    /// Names in the order the projects were scanned
    pub project_names: Vec<String>,
}

impl ContributorSummary {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            project_count: 0,
            project_names: Vec::new(),
        }
    }

    /// Masked id for presentation
    pub fn display_id(&self) -> String {
        mask(&self.id)
    }
}

/// Totals for the current project list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionStats {
    pub total_projects: usize,
    pub unique_contributor_count: usize,
    /// First-seen contributor first
    pub contributors: Vec<ContributorSummary>,
}

impl ContributionStats {
    /// Look up a contributor by raw id
    pub fn contributor(&self, id: &str) -> Option<&ContributorSummary> {
        self.contributors.iter().find(|c| c.id == id)
    }

    /// Sum of every contributor's project count
    pub fn total_contributions(&self) -> usize {
        self.contributors.iter().map(|c| c.project_count).sum()
    }
}

/// Rebuild contributor statistics from scratch.
///
/// Every occurrence of an id in a project's contributor list counts, so an
/// id listed twice on one project counts twice.
pub fn aggregate(projects: &[Project]) -> ContributionStats {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut contributors: Vec<ContributorSummary> = Vec::new();

    for project in projects {
        for contributor_id in &project.contributors {
            let slot = *index.entry(contributor_id.as_str()).or_insert_with(|| {
                contributors.push(ContributorSummary::new(contributor_id));
                contributors.len() - 1
            });

            let summary = &mut contributors[slot];
            summary.project_count += 1;
            summary.project_names.push(project.project_name.clone());
        }
    }

    ContributionStats {
        total_projects: projects.len(),
        unique_contributor_count: index.len(),
        contributors,
    }
}
