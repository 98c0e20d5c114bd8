//! Debounced card search.
//!
//! Each keystroke calls `update_text`. The status flips to `Loading` at
//! once; the request itself is only sent after the debounce period passes
//! without another keystroke. A newer keystroke cancels the older request,
//! and only the latest query may publish a result (last query wins).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::{cancellation, CancelHandle, CardCatalogClient, CardRepository, CatalogError};
use crate::cards::Card;
use crate::core::ClientConfig;

/// What the search box should display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchStatus {
    /// A request is pending or in flight.
    Loading,
    Ok(Vec<Card>),
    /// The catalog request failed; the message is for display.
    Error(String),
}

impl Default for SearchStatus {
    fn default() -> Self {
        Self::Ok(Vec::new())
    }
}

impl SearchStatus {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// `true` for a completed search with no results.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Ok(results) if results.is_empty())
    }
}

/// Status message when no Tokio runtime is available.
pub const NO_RUNTIME: &str = "search unavailable: no async runtime";

#[derive(Debug)]
struct Pending {
    cancel: CancelHandle,
    task: JoinHandle<()>,
}

impl Pending {
    fn stop(self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

#[derive(Debug, Default)]
struct Shared {
    text: String,
    /// Bumped on every keystroke; a task may only publish for its own.
    generation: u64,
    pending: Option<Pending>,
}

/// Search box state backed by a card repository.
#[derive(Debug)]
pub struct SearchSession<C> {
    repo: Arc<CardRepository<C>>,
    debounce: Duration,
    shared: Arc<Mutex<Shared>>,
    status: Arc<watch::Sender<SearchStatus>>,
    /// Runtime that debounced searches are spawned on.
    runtime: Option<Handle>,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<C: CardCatalogClient + 'static> SearchSession<C> {
    /// Searches run on the runtime current at construction, if any
    /// (see `with_runtime`).
    pub fn new(repo: Arc<CardRepository<C>>, config: &ClientConfig) -> Self {
        Self::with_debounce(repo, config.search_debounce())
    }

    pub fn with_debounce(repo: Arc<CardRepository<C>>, debounce: Duration) -> Self {
        let (status, _) = watch::channel(SearchStatus::default());
        Self {
            repo,
            debounce,
            shared: Arc::new(Mutex::new(Shared::default())),
            status: Arc::new(status),
            runtime: Handle::try_current().ok(),
        }
    }

    /// Spawn searches on `handle`.
    #[must_use]
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Current search text.
    pub fn text(&self) -> String {
        lock(&self.shared).text.clone()
    }

    pub fn status(&self) -> SearchStatus {
        self.status.borrow().clone()
    }

    /// Receiver that observes every status change.
    pub fn subscribe(&self) -> watch::Receiver<SearchStatus> {
        self.status.subscribe()
    }

    /// Wait until the latest query has produced a result or an error.
    pub async fn settled(&self) -> SearchStatus {
        let mut rx = self.status.subscribe();
        let settled = match rx.wait_for(|status| !status.is_loading()).await {
            Ok(status) => status.clone(),
            Err(_) => self.status(),
        };
        settled
    }

    /// Record a keystroke and schedule the debounced search.
    ///
    /// Any earlier pending search is cancelled. Without a runtime to run
    /// on, the status becomes an `Error` instead.
    pub fn update_text(&self, text: impl Into<String>) {
        let text = text.into();
        let mut shared = lock(&self.shared);

        if let Some(previous) = shared.pending.take() {
            debug!(query = %shared.text, "search superseded");
            previous.stop();
        }

        shared.generation += 1;
        shared.text.clone_from(&text);

        let Some(runtime) = &self.runtime else {
            warn!(query = %text, "no async runtime, search not sent");
            self.status
                .send_replace(SearchStatus::Error(NO_RUNTIME.to_string()));
            return;
        };
        self.status.send_replace(SearchStatus::Loading);

        let generation = shared.generation;
        let (cancel, signal) = cancellation();
        let repo = Arc::clone(&self.repo);
        let debounce = self.debounce;
        let state = Arc::clone(&self.shared);
        let status = Arc::clone(&self.status);

        let task = runtime.spawn(async move {
            tokio::select! {
                () = signal.cancelled() => return,
                () = tokio::time::sleep(debounce) => {}
            }

            let next = match repo.search_with_cancel(&text, &signal).await {
                Ok(cards) => SearchStatus::Ok(cards),
                Err(CatalogError::Cancelled) => return,
                Err(error) => SearchStatus::Error(error.to_string()),
            };

            let mut shared = lock(&state);
            if shared.generation == generation {
                shared.pending = None;
                status.send_replace(next);
            } else {
                debug!(query = %text, "dropping stale search result");
            }
        });

        shared.pending = Some(Pending { cancel, task });
    }
}

impl<C> Drop for SearchSession<C> {
    fn drop(&mut self) {
        if let Some(pending) = lock(&self.shared).pending.take() {
            pending.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardRegistry;

    fn session() -> SearchSession<CardRegistry> {
        let config = ClientConfig::default();
        let repo = CardRepository::from_config(CardRegistry::with_sample_cards(), &config);
        SearchSession::new(Arc::new(repo), &config)
    }

    #[test]
    fn test_initial_status() {
        let status = SearchStatus::default();
        assert_eq!(status, SearchStatus::Ok(Vec::new()));
        assert!(status.is_empty());
        assert!(!status.is_loading());
    }

    #[test]
    fn test_without_runtime_reports_error() {
        let session = session();
        session.update_text("squirtle");

        assert_eq!(session.text(), "squirtle");
        assert_eq!(session.status(), SearchStatus::Error(NO_RUNTIME.to_string()));
    }

    #[test]
    fn test_explicit_runtime() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let session = session().with_runtime(runtime.handle().clone());

        session.update_text("charm");
        let status = runtime.block_on(session.settled());

        let SearchStatus::Ok(cards) = status else {
            panic!("expected results, got {status:?}");
        };
        assert_eq!(cards[0].name(), "Charmander");
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_until_debounce_passes() {
        let session = session();
        session.update_text("squirtle");

        assert_eq!(session.text(), "squirtle");
        assert!(session.status().is_loading());

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(session.status().is_loading());

        let status = session.settled().await;
        let SearchStatus::Ok(cards) = status else {
            panic!("expected results, got {status:?}");
        };
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].name(), "Squirtle");
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_text_settles_empty() {
        let session = session();
        session.update_text("  ");
        assert!(session.settled().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_query_wins() {
        let session = session();
        session.update_text("b");
        tokio::time::sleep(Duration::from_millis(100)).await;
        session.update_text("bulb");
        tokio::time::sleep(Duration::from_millis(100)).await;
        session.update_text("charm");

        let status = session.settled().await;
        let SearchStatus::Ok(cards) = status else {
            panic!("expected results, got {status:?}");
        };
        let names: Vec<&str> = cards.iter().map(Card::name).collect();
        assert_eq!(names, vec!["Charmander"]);
        assert_eq!(session.text(), "charm");
    }
}
