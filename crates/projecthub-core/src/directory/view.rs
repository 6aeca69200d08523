//! Render-ready view of the project directory

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{ContributionStats, FilterState, Identity, Project};

/// Fetch lifecycle of the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryState {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A fetch is in flight; the previous list (if any) is still shown
    Loading,
    /// The latest fetch succeeded
    Ready,
    /// The latest fetch failed; the previous list (if any) is retained
    Failed,
}

impl DirectoryState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for DirectoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything a directory page needs to draw itself
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryView {
    pub state: DirectoryState,
    pub filters: FilterState,
    pub identity: Option<Identity>,
    pub projects: Vec<Project>,
    pub stats: ContributionStats,
    /// User-facing message for the last failed fetch
    pub error: Option<String>,
    /// Fetch number the published list came from (0 = none yet)
    pub published_fetch: u64,
}

impl DirectoryView {
    pub fn is_loading(&self) -> bool {
        self.state == DirectoryState::Loading
    }

    /// Find a listed project by id
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Projects the current identity owns and may certify
    pub fn owned_projects(&self) -> Vec<&Project> {
        match &self.identity {
            Some(identity) => self
                .projects
                .iter()
                .filter(|p| p.is_owned_by(identity))
                .collect(),
            None => Vec::new(),
        }
    }
}
