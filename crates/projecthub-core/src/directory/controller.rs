//! Directory controller: fetch → enrich → aggregate → publish
//!
//! Every filter change, identity change or explicit refresh issues a new
//! numbered fetch. Responses may come back in any order; a response is only
//! published when its fetch number is still the latest one issued, so a slow
//! earlier response can never overwrite a newer list. Superseded fetches are
//! not aborted, their results are just dropped on arrival.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::view::{DirectoryState, DirectoryView};
use crate::domain::{
    FilterState, Identity, IdentitySubscription, Project, RawProjectRecord, aggregate, build_query,
};
use crate::error::{Error, Result};
use crate::storage::ProjectStore;

/// What happened to a fetch once its response arrived
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The list was published
    Published { fetch: u64, projects: usize },
    /// The store failed; the previous list was kept
    Failed { fetch: u64, message: String },
    /// A newer fetch was issued meanwhile; the response was dropped
    Discarded { fetch: u64, latest: u64 },
}

impl FetchOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published { .. })
    }

    pub fn is_discarded(&self) -> bool {
        matches!(self, Self::Discarded { .. })
    }
}

#[derive(Debug, Default)]
struct FetchState {
    filters: FilterState,
    identity: Option<Identity>,
    /// Number of the most recently issued fetch
    latest: u64,
}

struct IdentityListener {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owns the current project list and its contributor statistics
#[derive(Clone)]
pub struct DirectoryController {
    store: Arc<dyn ProjectStore>,
    state: Arc<Mutex<FetchState>>,
    view: Arc<watch::Sender<DirectoryView>>,
    listener: Arc<Mutex<Option<IdentityListener>>>,
}

impl DirectoryController {
    /// Create an idle controller over the given store
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        let (view, _) = watch::channel(DirectoryView::default());
        Self {
            store,
            state: Arc::new(Mutex::new(FetchState::default())),
            view: Arc::new(view),
            listener: Arc::new(Mutex::new(None)),
        }
    }

    /// Create an idle controller whose first fetch will use `filters`
    pub fn with_filters(store: Arc<dyn ProjectStore>, filters: FilterState) -> Self {
        let controller = Self::new(store);
        if let Ok(mut state) = controller.state.lock() {
            state.filters = filters;
        }
        controller
    }

    /// Snapshot of the published view
    pub fn view(&self) -> DirectoryView {
        self.view.borrow().clone()
    }

    /// Observe every published view
    pub fn subscribe(&self) -> watch::Receiver<DirectoryView> {
        self.view.subscribe()
    }

    /// Current filters
    pub fn filters(&self) -> Result<FilterState> {
        Ok(self.lock_state()?.filters.clone())
    }

    /// Replace the filters and re-fetch
    pub async fn set_filters(&self, filters: FilterState) -> Result<FetchOutcome> {
        let request = {
            let mut state = self.lock_state()?;
            state.filters = filters;
            self.issue(&mut state)
        };
        Ok(self.complete(request).await)
    }

    /// Record a sign-in/sign-out and re-fetch
    pub async fn set_identity(&self, identity: Option<Identity>) -> Result<FetchOutcome> {
        let request = {
            let mut state = self.lock_state()?;
            state.identity = identity;
            self.issue(&mut state)
        };
        Ok(self.complete(request).await)
    }

    /// Re-fetch with the current filters and identity
    pub async fn refresh(&self) -> Result<FetchOutcome> {
        let request = {
            let mut state = self.lock_state()?;
            self.issue(&mut state)
        };
        Ok(self.complete(request).await)
    }

    /// Follow an identity subscription for the lifetime of this controller.
    ///
    /// The subscription's current identity is applied immediately (and
    /// fetched for); later transitions re-fetch in the background until
    /// [`Self::teardown`] is called. Binding again replaces the previous
    /// subscription.
    pub async fn bind_identity(&self, subscription: IdentitySubscription) -> Result<FetchOutcome> {
        self.teardown().await;

        let initial = self.set_identity(subscription.current()).await?;

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(listen_for_identity(
            self.clone(),
            subscription,
            cancel.clone(),
        ));
        *self.lock_listener()? = Some(IdentityListener { cancel, handle });

        Ok(initial)
    }

    /// Release the identity subscription, if any, and wait for it to stop
    pub async fn teardown(&self) {
        let listener = match self.listener.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        if let Some(listener) = listener {
            listener.cancel.cancel();
            if let Err(e) = listener.handle.await {
                warn!(error = %e, "Identity listener ended abnormally");
            }
            debug!("Identity subscription released");
        }
    }

    /// Whether an identity subscription is currently bound
    pub fn is_bound(&self) -> bool {
        self.listener
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, FetchState>> {
        self.state
            .lock()
            .map_err(|_| Error::Other("directory state lock poisoned".to_string()))
    }

    fn lock_listener(&self) -> Result<MutexGuard<'_, Option<IdentityListener>>> {
        self.listener
            .lock()
            .map_err(|_| Error::Other("identity listener lock poisoned".to_string()))
    }

    /// Number a new fetch and mark the view as loading
    fn issue(&self, state: &mut FetchState) -> FetchRequest {
        state.latest += 1;
        let query = build_query(&state.filters, state.identity.as_ref());
        info!(fetch = state.latest, query = %query, "Fetching projects");

        let filters = state.filters.clone();
        let identity = state.identity.clone();
        self.view.send_modify(|view| {
            view.state = DirectoryState::Loading;
            view.filters = filters;
            view.identity = identity;
        });

        FetchRequest {
            fetch: state.latest,
            query,
        }
    }

    async fn complete(&self, request: FetchRequest) -> FetchOutcome {
        let response = self.store.query(&request.query).await;

        let state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        if request.fetch != state.latest {
            debug!(
                fetch = request.fetch,
                latest = state.latest,
                "Discarding stale project response"
            );
            return FetchOutcome::Discarded {
                fetch: request.fetch,
                latest: state.latest,
            };
        }

        match response {
            Ok(records) => {
                let projects = enrich(records);
                let stats = aggregate(&projects);
                let count = projects.len();
                info!(
                    fetch = request.fetch,
                    projects = count,
                    contributors = stats.unique_contributor_count,
                    "Published project list"
                );
                self.view.send_modify(|view| {
                    view.state = DirectoryState::Ready;
                    view.projects = projects;
                    view.stats = stats;
                    view.error = None;
                    view.published_fetch = request.fetch;
                });
                FetchOutcome::Published {
                    fetch: request.fetch,
                    projects: count,
                }
            }
            Err(e) => {
                let message = Error::QueryFailed(e.to_string()).to_string();
                warn!(fetch = request.fetch, error = %e, "Failed to fetch projects");
                self.view.send_modify(|view| {
                    view.state = DirectoryState::Failed;
                    view.error = Some(message.clone());
                });
                FetchOutcome::Failed {
                    fetch: request.fetch,
                    message,
                }
            }
        }
    }
}

struct FetchRequest {
    fetch: u64,
    query: crate::domain::QuerySpec,
}

/// Turn raw records into projects, skipping records that fail validation
fn enrich(records: Vec<RawProjectRecord>) -> Vec<Project> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.id.clone();
            match Project::try_from(record) {
                Ok(project) => Some(project),
                Err(e) => {
                    warn!(project_id = %id, error = %e, "Skipping invalid project record");
                    None
                }
            }
        })
        .collect()
}

async fn listen_for_identity(
    controller: DirectoryController,
    mut subscription: IdentitySubscription,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            next = subscription.changed() => match next {
                Some(identity) => {
                    debug!(identity = ?identity.as_ref().map(|i| &i.id), "Identity changed");
                    if let Err(e) = controller.set_identity(identity).await {
                        warn!(error = %e, "Failed to apply identity change");
                    }
                }
                None => break,
            },
        }
    }
    subscription.unsubscribe();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Location, QuerySpec};
    use crate::storage::InMemoryProjectStore;
    use async_trait::async_trait;

    fn record(id: &str, name: &str, location: &str, contributors: &[&str]) -> RawProjectRecord {
        RawProjectRecord {
            id: id.to_string(),
            project_name: Some(name.to_string()),
            category: Some("Beach Cleaning".to_string()),
            location: Some(location.to_string()),
            contributors: Some(contributors.iter().map(|c| c.to_string()).collect()),
            ..Default::default()
        }
    }

    fn store() -> Arc<InMemoryProjectStore> {
        Arc::new(InMemoryProjectStore::with_records(vec![
            record("p1", "A", "VIRAR", &["u1", "u2"]),
            record("p2", "B", "VASAI", &["u1"]),
            record("p3", "C", "VIRAR", &["u3"]),
        ]))
    }

    struct FailingStore;

    #[async_trait]
    impl ProjectStore for FailingStore {
        async fn query(&self, _spec: &QuerySpec) -> Result<Vec<RawProjectRecord>> {
            Err(Error::Storage("store unreachable".to_string()))
        }

        async fn insert(&self, _record: RawProjectRecord) -> Result<String> {
            Err(Error::Storage("store unreachable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_starts_idle() {
        let controller = DirectoryController::new(store());
        let view = controller.view();
        assert_eq!(view.state, DirectoryState::Idle);
        assert!(view.projects.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_publishes_list_and_stats() {
        let controller = DirectoryController::new(store());
        let outcome = controller.refresh().await.unwrap();
        assert_eq!(outcome, FetchOutcome::Published { fetch: 1, projects: 3 });

        let view = controller.view();
        assert_eq!(view.state, DirectoryState::Ready);
        assert_eq!(view.stats.total_projects, 3);
        assert_eq!(view.stats.unique_contributor_count, 3);
        assert_eq!(view.stats.contributor("u1").unwrap().project_names, vec!["A", "B"]);
        assert_eq!(view.published_fetch, 1);
    }

    #[tokio::test]
    async fn test_filter_change_recomputes_stats_wholesale() {
        let controller = DirectoryController::new(store());
        controller.refresh().await.unwrap();

        controller
            .set_filters(FilterState::default().with_location(Location::Virar))
            .await
            .unwrap();

        let view = controller.view();
        assert_eq!(view.projects.len(), 2);
        assert_eq!(view.stats.total_projects, 2);
        assert_eq!(view.stats.contributor("u1").unwrap().project_count, 1);
        assert_eq!(view.filters.location, Some(Location::Virar));
    }

    #[tokio::test]
    async fn test_mine_only_requires_identity() {
        let controller = DirectoryController::new(store());
        controller
            .set_filters(FilterState::default().mine_only())
            .await
            .unwrap();
        assert_eq!(controller.view().projects.len(), 3);

        controller
            .set_identity(Some(Identity::new("u3")))
            .await
            .unwrap();
        let view = controller.view();
        assert_eq!(view.projects.len(), 1);
        assert_eq!(view.projects[0].id, "p3");
        assert_eq!(view.owned_projects().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_retains_previous_list() {
        let good = DirectoryController::new(store());
        good.refresh().await.unwrap();
        let previous = good.view();

        let controller = DirectoryController {
            store: Arc::new(FailingStore),
            ..good.clone()
        };
        let outcome = controller.refresh().await.unwrap();
        assert!(matches!(outcome, FetchOutcome::Failed { fetch: 2, .. }));

        let view = controller.view();
        assert_eq!(view.state, DirectoryState::Failed);
        assert_eq!(view.projects, previous.projects);
        assert!(view.error.as_deref().unwrap().contains("store unreachable"));
    }

    #[tokio::test]
    async fn test_failure_without_previous_list() {
        let controller = DirectoryController::new(Arc::new(FailingStore));
        controller.refresh().await.unwrap();
        let view = controller.view();
        assert_eq!(view.state, DirectoryState::Failed);
        assert!(view.projects.is_empty());
        assert!(view.error.is_some());
    }

    #[tokio::test]
    async fn test_invalid_records_are_skipped() {
        let bad = record("p9", "Bad", "ATLANTIS", &["u9"]);
        let store = Arc::new(InMemoryProjectStore::with_records(vec![
            record("p1", "A", "VIRAR", &["u1"]),
            bad,
        ]));
        let controller = DirectoryController::new(store);
        let outcome = controller.refresh().await.unwrap();
        assert_eq!(outcome, FetchOutcome::Published { fetch: 1, projects: 1 });
        assert!(controller.view().stats.contributor("u9").is_none());
    }

    #[tokio::test]
    async fn test_subscribers_observe_published_views() {
        let controller = DirectoryController::new(store());
        let mut rx = controller.subscribe();
        controller.refresh().await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().state, DirectoryState::Ready);
    }
}
