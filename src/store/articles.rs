use super::state::{ArticleCollection, SyncState};
use crate::api::{ApiClient, ApiError, ArticleId};
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{watch, OwnedMutexGuard};
use tokio::task::AbortHandle;
use url::Url;

type FetchOutcome = Result<ArticleCollection, Arc<ApiError>>;

/// A fetch every concurrent `list()` caller can await.
///
/// Resolves to `None` when the fetch was aborted or its result discarded
/// because an invalidation superseded it.
type SharedFetch = Shared<BoxFuture<'static, Option<FetchOutcome>>>;

struct InFlight {
    epoch: u64,
    fetch: SharedFetch,
    abort: AbortHandle,
}

struct Cache {
    state: SyncState,
    /// Set on creation and by every invalidation, cleared when a fetch lands.
    stale: bool,
    /// Bumped on invalidation. A fetch may only publish under the epoch it
    /// was started with.
    epoch: u64,
    in_flight: Option<InFlight>,
    fetched_at: Option<DateTime<Utc>>,
}

struct Inner {
    api: ApiClient,
    cache: Mutex<Cache>,
    notify: watch::Sender<SyncState>,
    /// Per-article mutation locks. Entries are removed when the last holder
    /// releases them.
    id_locks: Mutex<HashMap<ArticleId, Arc<tokio::sync::Mutex<()>>>>,
}

impl Inner {
    // Critical sections never panic, so a poisoned lock still holds
    // consistent data.
    fn lock_cache(&self) -> MutexGuard<'_, Cache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_ids(&self) -> MutexGuard<'_, HashMap<ArticleId, Arc<tokio::sync::Mutex<()>>>> {
        self.id_locks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish a finished fetch unless an invalidation happened meanwhile.
    fn complete(&self, epoch: u64, result: FetchOutcome) -> Option<FetchOutcome> {
        let mut cache = self.lock_cache();
        if cache.epoch != epoch {
            tracing::debug!(
                epoch,
                current_epoch = cache.epoch,
                "Discarding superseded article fetch"
            );
            return None;
        }

        match &result {
            Ok(articles) => {
                tracing::info!(count = articles.len(), epoch, "Article snapshot replaced");
                cache.state = SyncState::Ready(Arc::clone(articles));
                cache.fetched_at = Some(Utc::now());
            }
            Err(e) => {
                tracing::warn!(error = %e, kind = ?e.kind(), epoch, "Article fetch failed");
                cache.state = SyncState::Failed(Arc::clone(e));
            }
        }
        cache.stale = false;
        cache.in_flight = None;
        self.notify.send_replace(cache.state.clone());

        Some(result)
    }
}

/// Client-side owner of the article snapshot.
///
/// Every consumer sees the same [`SyncState`]. Reads are served from the
/// cached snapshot until a successful mutation invalidates it; the next
/// [`list`](Self::list) then refetches the whole collection. Mutations never
/// touch the snapshot locally.
///
/// Cheap to clone: clones share one cache, one in-flight fetch and one set of
/// observers.
#[derive(Clone)]
pub struct ArticleStore {
    inner: Arc<Inner>,
}

impl ArticleStore {
    pub fn new(api: ApiClient) -> Self {
        let (notify, _) = watch::channel(SyncState::Loading);
        Self {
            inner: Arc::new(Inner {
                api,
                cache: Mutex::new(Cache {
                    state: SyncState::Loading,
                    stale: true,
                    epoch: 0,
                    in_flight: None,
                    fetched_at: None,
                }),
                notify,
                id_locks: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Return the snapshot, fetching it first when missing, stale or failed.
    ///
    /// Callers arriving while a fetch is in flight attach to it instead of
    /// issuing their own request. If an invalidation supersedes the fetch
    /// being awaited, the call follows on to the replacement fetch.
    pub async fn list(&self) -> SyncState {
        loop {
            let fetch = {
                let mut cache = self.inner.lock_cache();
                if !cache.stale && matches!(cache.state, SyncState::Ready(_)) {
                    return cache.state.clone();
                }
                let attached = cache.in_flight.as_ref().map(|f| f.fetch.clone());
                match attached {
                    Some(fetch) => fetch,
                    None => self.start_fetch(&mut cache),
                }
            };

            match fetch.await {
                Some(Ok(articles)) => return SyncState::Ready(articles),
                Some(Err(e)) => return SyncState::Failed(e),
                None => tracing::debug!("Awaited fetch was superseded, following on"),
            }
        }
    }

    fn start_fetch(&self, cache: &mut Cache) -> SharedFetch {
        let epoch = cache.epoch;
        let inner = Arc::clone(&self.inner);
        tracing::debug!(epoch, "Starting article fetch");

        let handle = tokio::spawn(async move {
            let result = inner
                .api
                .list_articles()
                .await
                .map(ArticleCollection::from)
                .map_err(Arc::new);
            inner.complete(epoch, result)
        });
        let abort = handle.abort_handle();
        let fetch = handle.map(|joined| joined.ok().flatten()).boxed().shared();

        cache.in_flight = Some(InFlight {
            epoch,
            fetch: fetch.clone(),
            abort,
        });
        cache.state = SyncState::Loading;
        self.inner.notify.send_replace(SyncState::Loading);

        fetch
    }

    /// Mark the snapshot stale and supersede any in-flight fetch.
    ///
    /// Does not fetch by itself; the next `list()` does.
    pub fn invalidate(&self) {
        let mut cache = self.inner.lock_cache();
        cache.epoch = cache.epoch.wrapping_add(1);
        cache.stale = true;
        if let Some(in_flight) = cache.in_flight.take() {
            in_flight.abort.abort();
            tracing::debug!(epoch = in_flight.epoch, "Aborted superseded article fetch");
        }
        tracing::debug!(epoch = cache.epoch, "Article snapshot invalidated");
    }

    /// Delete an article on the backend, then invalidate.
    ///
    /// On failure the snapshot is left exactly as it was.
    pub async fn remove(&self, id: ArticleId) -> Result<(), ApiError> {
        let _guard = self.lock_article(id).await;

        if let Err(e) = self.inner.api.delete_article(id).await {
            tracing::warn!(article_id = id, error = %e, "Failed to delete article");
            return Err(e);
        }

        tracing::info!(article_id = id, "Article deleted");
        self.invalidate();
        Ok(())
    }

    /// Set an article's category on the backend, then invalidate.
    ///
    /// An empty `category` clears it. On failure nothing local changes.
    pub async fn set_category(&self, id: ArticleId, category: &str) -> Result<(), ApiError> {
        let _guard = self.lock_article(id).await;

        if let Err(e) = self.inner.api.set_category(id, category).await {
            tracing::warn!(article_id = id, category, error = %e, "Failed to update category");
            return Err(e);
        }

        tracing::info!(article_id = id, category, "Article category updated");
        self.invalidate();
        Ok(())
    }

    /// Current state without triggering a fetch.
    pub fn current(&self) -> SyncState {
        self.inner.lock_cache().state.clone()
    }

    /// Observe every state transition.
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.inner.notify.subscribe()
    }

    /// When the current snapshot was received, if ever.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.inner.lock_cache().fetched_at
    }

    pub fn base_url(&self) -> &Url {
        self.inner.api.base_url()
    }

    /// Serialize mutations per article id. Waiters are served in FIFO order.
    async fn lock_article(&self, id: ArticleId) -> ArticleGuard {
        let lock = {
            let mut locks = self.inner.lock_ids();
            Arc::clone(locks.entry(id).or_default())
        };
        let guard = Arc::clone(&lock).lock_owned().await;
        ArticleGuard {
            inner: Arc::clone(&self.inner),
            id,
            lock,
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    fn pending_id_locks(&self) -> usize {
        self.inner.lock_ids().len()
    }
}

struct ArticleGuard {
    inner: Arc<Inner>,
    id: ArticleId,
    lock: Arc<tokio::sync::Mutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for ArticleGuard {
    fn drop(&mut self) {
        self.guard.take();
        let mut locks = self.inner.lock_ids();
        // Only the map and this guard still reference the lock
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.id);
        }
    }
}
