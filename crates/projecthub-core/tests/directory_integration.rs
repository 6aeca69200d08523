//! Directory controller integration tests
//!
//! Fetch ordering is exercised with a store whose responses are released by
//! hand through oneshot channels, so tests pick the completion order.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures_util::FutureExt;
use projecthub_core::directory::{DirectoryController, DirectoryState, FetchOutcome};
use projecthub_core::domain::{
    FilterState, Identity, IdentityProvider, InMemorySessionCache, LocalIdentityProvider,
    Location, QuerySpec, RawProjectRecord, Urgency,
};
use projecthub_core::storage::{InMemoryProjectStore, JsonlProjectStore, ProjectStore};
use projecthub_core::{Error, Result};
use tokio::sync::oneshot;

type Response = Result<Vec<RawProjectRecord>>;

/// Store that answers each query with whatever the test sends on the
/// matching gate, in call order
#[derive(Default)]
struct GatedStore {
    gates: Mutex<VecDeque<oneshot::Receiver<Response>>>,
    calls: AtomicUsize,
    queries: Mutex<Vec<QuerySpec>>,
}

impl GatedStore {
    fn gate(&self) -> oneshot::Sender<Response> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(rx);
        tx
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn wait_for_calls(&self, n: usize) {
        while self.calls() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl ProjectStore for GatedStore {
    async fn query(&self, spec: &QuerySpec) -> Result<Vec<RawProjectRecord>> {
        let gate = self
            .gates
            .lock()
            .unwrap()
            .pop_front()
            .expect("test issued more fetches than gates");
        self.queries.lock().unwrap().push(spec.clone());
        self.calls.fetch_add(1, Ordering::SeqCst);
        gate.await
            .map_err(|_| Error::QueryFailed("gate dropped".to_string()))?
    }

    async fn insert(&self, _record: RawProjectRecord) -> Result<String> {
        Err(Error::Storage("read-only".to_string()))
    }
}

fn record(id: &str, name: &str, location: &str, contributors: &[&str]) -> RawProjectRecord {
    RawProjectRecord {
        id: id.to_string(),
        project_name: Some(name.to_string()),
        category: Some("School Upgrades".to_string()),
        location: Some(location.to_string()),
        contributors: Some(contributors.iter().map(|c| c.to_string()).collect()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_stale_response_never_overwrites_newer_state() {
    let store = Arc::new(GatedStore::default());
    let older_gate = store.gate();
    let newer_gate = store.gate();
    let controller = DirectoryController::new(store.clone());

    let older = {
        let controller = controller.clone();
        tokio::spawn(async move {
            controller
                .set_filters(FilterState::default().with_location(Location::Vasai))
                .await
        })
    };
    store.wait_for_calls(1).await;

    let newer = {
        let controller = controller.clone();
        tokio::spawn(async move {
            controller
                .set_filters(FilterState::default().with_location(Location::Virar))
                .await
        })
    };
    store.wait_for_calls(2).await;
    assert_eq!(controller.view().state, DirectoryState::Loading);

    // newer response arrives first
    newer_gate
        .send(Ok(vec![record("n1", "Newer", "VIRAR", &["u1"])]))
        .unwrap();
    let newer_outcome = newer.await.unwrap().unwrap();
    assert_eq!(newer_outcome, FetchOutcome::Published { fetch: 2, projects: 1 });

    // then the slow, older one
    older_gate
        .send(Ok(vec![
            record("o1", "Older", "VASAI", &["u2"]),
            record("o2", "Older 2", "VASAI", &["u3"]),
        ]))
        .unwrap();
    let older_outcome = older.await.unwrap().unwrap();
    assert_eq!(older_outcome, FetchOutcome::Discarded { fetch: 1, latest: 2 });

    let view = controller.view();
    assert_eq!(view.state, DirectoryState::Ready);
    assert_eq!(view.published_fetch, 2);
    assert_eq!(view.projects.len(), 1);
    assert_eq!(view.projects[0].project_name, "Newer");
    assert_eq!(view.filters.location, Some(Location::Virar));
    assert!(view.stats.contributor("u2").is_none());
}

#[tokio::test]
async fn test_in_order_responses_end_on_latest() {
    let store = Arc::new(GatedStore::default());
    let first_gate = store.gate();
    let second_gate = store.gate();
    let controller = DirectoryController::new(store.clone());

    let first = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.refresh().await })
    };
    store.wait_for_calls(1).await;
    let second = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.refresh().await })
    };
    store.wait_for_calls(2).await;

    first_gate
        .send(Ok(vec![record("a", "First", "VIRAR", &[])]))
        .unwrap();
    assert!(first.await.unwrap().unwrap().is_discarded());
    // the superseded response did not leave the loading state
    assert_eq!(controller.view().state, DirectoryState::Loading);

    second_gate
        .send(Ok(vec![record("b", "Second", "VIRAR", &[])]))
        .unwrap();
    assert!(second.await.unwrap().unwrap().is_published());
    assert_eq!(controller.view().projects[0].project_name, "Second");
}

#[tokio::test]
async fn test_stale_failure_is_ignored_too() {
    let store = Arc::new(GatedStore::default());
    let older_gate = store.gate();
    let newer_gate = store.gate();
    let controller = DirectoryController::new(store.clone());

    let older = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.refresh().await })
    };
    store.wait_for_calls(1).await;
    let newer = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.refresh().await })
    };
    store.wait_for_calls(2).await;

    newer_gate
        .send(Ok(vec![record("n1", "Newer", "VIRAR", &["u1"])]))
        .unwrap();
    newer.await.unwrap().unwrap();

    older_gate
        .send(Err(Error::QueryFailed("timeout".to_string())))
        .unwrap();
    assert!(older.await.unwrap().unwrap().is_discarded());

    let view = controller.view();
    assert_eq!(view.state, DirectoryState::Ready);
    assert_eq!(view.error, None);
}

#[tokio::test]
async fn test_fetch_waits_for_store() {
    let store = Arc::new(GatedStore::default());
    let gate = store.gate();
    let controller = DirectoryController::new(store.clone());

    let mut pending = Box::pin(controller.refresh());
    assert!((&mut pending).now_or_never().is_none());
    assert_eq!(controller.view().state, DirectoryState::Loading);

    gate.send(Ok(Vec::new())).unwrap();
    assert!(pending.await.unwrap().is_published());
    assert_eq!(controller.view().state, DirectoryState::Ready);
}

#[tokio::test]
async fn test_identity_subscription_drives_refetch() {
    let store = Arc::new(InMemoryProjectStore::with_records(vec![
        record("p1", "Mine", "MALAD", &["u1"]),
        record("p2", "Theirs", "MALAD", &["u2"]),
    ]));
    let provider = LocalIdentityProvider::new(Arc::new(InMemorySessionCache::default())).unwrap();
    let controller = DirectoryController::new(store);

    controller
        .set_filters(FilterState::default().mine_only())
        .await
        .unwrap();
    let initial = controller.bind_identity(provider.subscribe()).await.unwrap();
    assert!(initial.is_published());
    assert_eq!(controller.view().projects.len(), 2);
    assert!(controller.is_bound());

    let mut views = controller.subscribe();
    provider.sign_in(Identity::new("u1")).await.unwrap();

    loop {
        views.changed().await.unwrap();
        let view = views.borrow_and_update().clone();
        if view.state == DirectoryState::Ready && view.identity.is_some() {
            assert_eq!(view.projects.len(), 1);
            assert_eq!(view.projects[0].id, "p1");
            break;
        }
    }
}

#[tokio::test]
async fn test_teardown_releases_subscription() {
    let store = Arc::new(InMemoryProjectStore::new());
    let provider = LocalIdentityProvider::new(Arc::new(InMemorySessionCache::default())).unwrap();
    let controller = DirectoryController::new(store);

    controller.bind_identity(provider.subscribe()).await.unwrap();
    assert_eq!(provider.subscriber_count(), 1);

    controller.teardown().await;
    assert!(!controller.is_bound());
    assert_eq!(provider.subscriber_count(), 0);

    let published = controller.view().published_fetch;
    provider.sign_in(Identity::new("u1")).await.unwrap();
    tokio::task::yield_now().await;
    assert_eq!(controller.view().published_fetch, published);
    assert_eq!(controller.view().identity, None);
}

#[tokio::test]
async fn test_mine_only_query_shape_follows_identity() {
    let store = Arc::new(GatedStore::default());
    let anonymous = store.gate();
    let signed_in = store.gate();
    let controller = DirectoryController::new(store.clone());

    anonymous.send(Ok(Vec::new())).unwrap();
    controller
        .set_filters(FilterState::default().mine_only())
        .await
        .unwrap();

    signed_in.send(Ok(Vec::new())).unwrap();
    controller
        .set_identity(Some(Identity::new("u1")))
        .await
        .unwrap();

    let queries = store.queries.lock().unwrap().clone();
    assert!(queries[0].is_unrestricted());
    assert_eq!(queries[1].predicates.len(), 1);
}

#[tokio::test]
async fn test_fractional_duration_in_store_still_publishes() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("projects.jsonl");
    std::fs::write(
        &path,
        concat!(
            r#"{"id":"p1","projectName":"Whole","category":"Beach Cleaning","location":"VIRAR","duration":2}"#,
            "\n",
            r#"{"id":"p2","projectName":"Half","category":"Beach Cleaning","location":"VIRAR","duration":4.5}"#,
            "\n",
        ),
    )
    .unwrap();

    let controller = DirectoryController::new(Arc::new(JsonlProjectStore::new(&path)));
    let outcome = controller.refresh().await.unwrap();
    assert_eq!(outcome, FetchOutcome::Published { fetch: 1, projects: 2 });

    let view = controller.view();
    assert_eq!(view.state, DirectoryState::Ready);
    assert_eq!(view.project("p2").unwrap().urgency(), Urgency::Medium);
}

#[tokio::test]
async fn test_preset_filters_fetch_once_on_bind() {
    let store = Arc::new(GatedStore::default());
    store.gate().send(Ok(vec![record("p1", "Mine", "MALAD", &["u1"])])).unwrap();

    let provider = LocalIdentityProvider::new(Arc::new(InMemorySessionCache::default())).unwrap();
    provider.sign_in(Identity::new("u1")).await.unwrap();

    let controller =
        DirectoryController::with_filters(store.clone(), FilterState::default().mine_only());
    let outcome = controller.bind_identity(provider.subscribe()).await.unwrap();
    controller.teardown().await;

    assert_eq!(outcome, FetchOutcome::Published { fetch: 1, projects: 1 });
    assert_eq!(store.calls(), 1);
    let queries = store.queries.lock().unwrap().clone();
    assert_eq!(queries[0].predicates.len(), 1);
    assert!(controller.view().filters.my_projects_only);
}
