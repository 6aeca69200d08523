//! Modal selection state: nothing open, a project's detail view, or its
//! certificate view
//!
//! At most one project is selected at a time, and every transition replaces
//! the whole state in one assignment, so a detail view and a certificate of
//! different projects can never be open together.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::certificate::CertificateRequest;
use crate::domain::{Identity, Project};
use crate::error::{Error, Result};

/// Title used when a selection carries no project name
pub const FALLBACK_PROJECT_TITLE: &str = "Community Project";

/// What is currently shown on top of the directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "project", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    None,
    Detail(Project),
    Certificate(Project),
}

impl Selection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Detail(_) => "detail",
            Self::Certificate(_) => "certificate",
        }
    }

    /// The selected project, whichever view it is shown in
    pub fn project(&self) -> Option<&Project> {
        match self {
            Self::None => None,
            Self::Detail(project) | Self::Certificate(project) => Some(project),
        }
    }
}

/// Coordinates which project (and which view of it) is open
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    selection: Selection,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Open the detail view of a project, replacing whatever was open
    pub fn select(&mut self, project: Project) {
        debug!(project_id = %project.id, from = self.selection.as_str(), "Selecting project");
        self.selection = Selection::Detail(project);
    }

    /// Close the detail view
    pub fn close_detail(&mut self) {
        debug!(from = self.selection.as_str(), "Closing detail view");
        self.selection = Selection::None;
    }

    /// Switch the open detail view to its certificate.
    ///
    /// Only valid while a detail view is open, and only for the project's
    /// recorded owner. Refused requests leave the selection untouched.
    pub fn request_certificate(&mut self, caller: Option<&Identity>) -> Result<CertificateRequest> {
        let project = match &self.selection {
            Selection::Detail(project) => project,
            other => {
                return Err(Error::InvalidTransition(format!(
                    "a certificate can only be requested from a project's detail view (currently: {})",
                    other.as_str()
                )));
            }
        };

        let request = authorize(project, caller)?;
        info!(project_id = %project.id, "Opening certificate");
        self.selection = Selection::Certificate(project.clone());
        Ok(request)
    }

    /// Select a project and open its certificate in one step.
    ///
    /// This is the shortcut offered next to each listed project, so unlike
    /// [`Self::request_certificate`] it does not need a detail view to be
    /// open first. The owner check is the same, and a refused call leaves the
    /// current selection untouched.
    pub fn open_certificate(
        &mut self,
        project: Project,
        caller: Option<&Identity>,
    ) -> Result<CertificateRequest> {
        let request = authorize(&project, caller)?;
        info!(project_id = %project.id, "Opening certificate");
        self.selection = Selection::Certificate(project);
        Ok(request)
    }

    /// Close the certificate view
    pub fn close_certificate(&mut self) -> Result<()> {
        if !matches!(self.selection, Selection::Certificate(_)) {
            return Err(Error::InvalidTransition(format!(
                "no certificate is open (currently: {})",
                self.selection.as_str()
            )));
        }

        debug!("Closing certificate view");
        self.selection = Selection::None;
        Ok(())
    }
}

fn authorize(project: &Project, caller: Option<&Identity>) -> Result<CertificateRequest> {
    let caller = caller.ok_or(Error::NotSignedIn)?;

    if !project.is_owned_by(caller) {
        warn!(project_id = %project.id, caller = %caller.id, "Certificate refused for non-owner");
        return Err(Error::AuthorizationDenied(project.project_name.clone()));
    }

    let recipient = caller.recipient_name().ok_or_else(|| {
        Error::RenderPrecondition("signed-in identity has no display name or email".to_string())
    })?;

    let title = match project.project_name.trim() {
        "" => FALLBACK_PROJECT_TITLE.to_string(),
        name => name.to_string(),
    };

    Ok(CertificateRequest::new(recipient, title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Location};

    fn project(id: &str, contributors: &[&str]) -> Project {
        Project {
            id: id.to_string(),
            project_name: format!("Project {}", id),
            project_description: String::new(),
            category: Category::PublicResourceDevelopment,
            location: Location::Andheri,
            start_date: None,
            duration: Some(5),
            contributors: contributors.iter().map(|c| c.to_string()).collect(),
            project_image: None,
        }
    }

    fn owner() -> Identity {
        Identity::new("owner").with_display_name("Jane Doe")
    }

    #[test]
    fn test_select_and_close() {
        let mut modal = SelectionController::new();
        modal.select(project("p1", &["owner"]));
        assert!(matches!(modal.selection(), Selection::Detail(p) if p.id == "p1"));

        modal.close_detail();
        assert_eq!(modal.selection(), &Selection::None);
    }

    #[test]
    fn test_owner_gets_certificate() {
        let mut modal = SelectionController::new();
        modal.select(project("p1", &["owner", "helper"]));

        let request = modal.request_certificate(Some(&owner())).unwrap();
        assert_eq!(request.recipient_display_name, "Jane Doe");
        assert_eq!(request.project_title, "Project p1");
        assert!(matches!(modal.selection(), Selection::Certificate(p) if p.id == "p1"));

        modal.close_certificate().unwrap();
        assert_eq!(modal.selection(), &Selection::None);
    }

    #[test]
    fn test_non_owner_is_refused() {
        let mut modal = SelectionController::new();
        modal.select(project("p1", &["owner", "helper"]));

        let err = modal
            .request_certificate(Some(&Identity::new("helper").with_display_name("Helper")))
            .unwrap_err();
        assert!(matches!(err, Error::AuthorizationDenied(_)));
        assert!(matches!(modal.selection(), Selection::Detail(_)));
    }

    #[test]
    fn test_anonymous_is_refused() {
        let mut modal = SelectionController::new();
        modal.select(project("p1", &["owner"]));
        assert!(matches!(
            modal.request_certificate(None),
            Err(Error::NotSignedIn)
        ));
    }

    #[test]
    fn test_project_without_contributors_has_no_owner() {
        let mut modal = SelectionController::new();
        modal.select(project("p1", &[]));
        assert!(matches!(
            modal.request_certificate(Some(&owner())),
            Err(Error::AuthorizationDenied(_))
        ));
    }

    #[test]
    fn test_certificate_requires_open_detail() {
        let mut modal = SelectionController::new();
        assert!(matches!(
            modal.request_certificate(Some(&owner())),
            Err(Error::InvalidTransition(_))
        ));
        assert!(modal.close_certificate().is_err());
    }

    #[test]
    fn test_selecting_another_project_replaces_certificate() {
        let mut modal = SelectionController::new();
        modal
            .open_certificate(project("p1", &["owner"]), Some(&owner()))
            .unwrap();

        modal.select(project("p2", &["someone"]));
        assert!(matches!(modal.selection(), Selection::Detail(p) if p.id == "p2"));
        assert_eq!(modal.selection().project().map(|p| p.id.as_str()), Some("p2"));
    }

    #[test]
    fn test_recipient_falls_back_to_email() {
        let mut modal = SelectionController::new();
        let caller = Identity::new("owner").with_email("jane.doe@example.com");
        let request = modal
            .open_certificate(project("p1", &["owner"]), Some(&caller))
            .unwrap();
        assert_eq!(request.recipient_display_name, "jane.doe");
    }

    #[test]
    fn test_identity_without_name_cannot_be_certified() {
        let mut modal = SelectionController::new();
        let err = modal
            .open_certificate(project("p1", &["owner"]), Some(&Identity::new("owner")))
            .unwrap_err();
        assert!(matches!(err, Error::RenderPrecondition(_)));
        assert_eq!(modal.selection(), &Selection::None);
    }

    #[test]
    fn test_open_certificate_shortcut_skips_detail_but_not_owner_check() {
        let owner = Identity::new("u1").with_display_name("Jane Doe");
        let visitor = Identity::new("u2").with_display_name("John Roe");
        let mut modal = SelectionController::new();

        modal.select(project("p1", &["u2"]));
        assert!(modal.open_certificate(project("p2", &["u1"]), Some(&visitor)).is_err());
        assert!(matches!(modal.selection(), Selection::Detail(p) if p.id == "p1"));

        let request = modal.open_certificate(project("p2", &["u1"]), Some(&owner)).unwrap();
        assert_eq!(request.recipient_display_name, "Jane Doe");
        assert!(matches!(modal.selection(), Selection::Certificate(p) if p.id == "p2"));
    }
}
