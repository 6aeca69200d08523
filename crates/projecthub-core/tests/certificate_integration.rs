//! Certificate flow: directory → selection → owner check → render

use std::sync::Arc;

use projecthub_core::certificate::{CANVAS_HEIGHT, CANVAS_WIDTH, CertificateRequest, render};
use projecthub_core::directory::DirectoryController;
use projecthub_core::domain::{Identity, ProjectSubmission};
use projecthub_core::selection::{Selection, SelectionController};
use projecthub_core::storage::{InMemoryProjectStore, ProjectStore};
use projecthub_core::Error;

fn submission(name: &str) -> ProjectSubmission {
    ProjectSubmission {
        project_name: name.to_string(),
        project_description: "Weekend clean-up along the shore".to_string(),
        category: "Beach Cleaning".to_string(),
        location: "VIRAR".to_string(),
        start_date: Some("2024-01-13".to_string()),
        duration: Some("2".to_string()),
        project_image: None,
    }
}

#[test]
fn test_render_is_deterministic_with_expected_filename() {
    let request = CertificateRequest::new("Jane Doe", "Beach Cleanup");
    let first = render(&request).unwrap();
    let second = render(&request).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.filename(), "Certificate_Jane_Doe.png");

    let decoded = image::load_from_memory(first.png_bytes()).unwrap();
    assert_eq!(decoded.width(), CANVAS_WIDTH);
    assert_eq!(decoded.height(), CANVAS_HEIGHT);
    assert!(first.data_url().starts_with("data:image/png;base64,iVBORw0KGgo"));
}

#[tokio::test]
async fn test_owner_can_certify_submitted_project() {
    let store = Arc::new(InMemoryProjectStore::new());
    let owner = Identity::new("owner-uid-001").with_display_name("Jane Doe");

    let record = submission("Beach Cleanup")
        .into_record(Some(&owner), chrono::Utc::now())
        .unwrap();
    let id = store.insert(record).await.unwrap();

    let controller = DirectoryController::new(store);
    controller.set_identity(Some(owner.clone())).await.unwrap();
    let view = controller.view();
    let project = view.project(&id).unwrap().clone();

    let mut modal = SelectionController::new();
    modal.select(project);
    let request = modal.request_certificate(Some(&owner)).unwrap();
    assert!(matches!(modal.selection(), Selection::Certificate(_)));

    let artifact = render(&request).unwrap();
    assert_eq!(artifact.filename(), "Certificate_Jane_Doe.png");
    assert_eq!(
        artifact.png_bytes(),
        render(&CertificateRequest::new("Jane Doe", "Beach Cleanup"))
            .unwrap()
            .png_bytes()
    );
}

#[tokio::test]
async fn test_non_owner_never_reaches_renderer() {
    let store = Arc::new(InMemoryProjectStore::new());
    let owner = Identity::new("owner-uid-001").with_display_name("Jane Doe");
    let visitor = Identity::new("visitor-uid-777").with_display_name("John Roe");

    let record = submission("Beach Cleanup")
        .into_record(Some(&owner), chrono::Utc::now())
        .unwrap();
    let id = store.insert(record).await.unwrap();

    let controller = DirectoryController::new(store);
    controller.set_identity(Some(visitor.clone())).await.unwrap();
    let project = controller.view().project(&id).unwrap().clone();

    let mut modal = SelectionController::new();
    let err = modal.open_certificate(project.clone(), Some(&visitor)).unwrap_err();
    assert!(matches!(err, Error::AuthorizationDenied(_)));
    assert_eq!(modal.selection(), &Selection::None);

    modal.select(project);
    assert!(matches!(
        modal.request_certificate(Some(&visitor)),
        Err(Error::AuthorizationDenied(_))
    ));
    assert!(matches!(modal.selection(), Selection::Detail(_)));
}
