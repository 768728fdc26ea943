//! List polling
//!
//! Periodic re-fetch keeping a view's list loosely synchronized with the
//! server. At most one fetch is in flight per poller; a failed fetch
//! keeps the previous list; a stopped poller discards whatever is still
//! in flight instead of applying it.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::ClientResult;

/// Source of a polled list.
///
/// Blanket-implemented for async closures, which is what the view-models
/// pass in.
#[async_trait]
pub trait FetchList<T>: Send {
    async fn fetch(&mut self) -> ClientResult<Vec<T>>;
}

#[async_trait]
impl<T, F, Fut> FetchList<T> for F
where
    T: Send + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ClientResult<Vec<T>>> + Send + 'static,
{
    async fn fetch(&mut self) -> ClientResult<Vec<T>> {
        (self)().await
    }
}

/// Spawns poll loops
pub struct Poller;

impl Poller {
    /// Start polling `fetcher` every `interval`.
    ///
    /// The first fetch runs immediately. Ticks that would overlap a slow
    /// fetch are delayed, never stacked.
    pub fn spawn<T, F>(name: &'static str, interval: Duration, mut fetcher: F) -> PollerHandle<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FetchList<T> + 'static,
    {
        let list = Arc::new(RwLock::new(Vec::new()));
        let token = CancellationToken::new();

        let task_list = Arc::clone(&list);
        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            let run = run_loop(name, interval, &mut fetcher, &task_list, &task_token);
            if AssertUnwindSafe(run).catch_unwind().await.is_err() {
                tracing::error!(poller = name, "Poll task panicked");
            }
        });

        tracing::debug!(poller = name, interval_ms = interval.as_millis() as u64, "Poller started");

        PollerHandle {
            list,
            token,
            handle: Some(handle),
        }
    }
}

async fn run_loop<T, F>(
    name: &'static str,
    interval: Duration,
    fetcher: &mut F,
    list: &RwLock<Vec<T>>,
    token: &CancellationToken,
) where
    T: Clone + Send + Sync + 'static,
    F: FetchList<T>,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let fetched = tokio::select! {
            _ = token.cancelled() => break,
            result = fetcher.fetch() => result,
        };

        // A stop that raced the fetch must not apply a stale result.
        if token.is_cancelled() {
            break;
        }

        match fetched {
            Ok(items) => {
                *list.write().await = items;
            }
            Err(e) => {
                tracing::warn!(poller = name, error = %e, "Poll fetch failed, keeping previous list");
            }
        }
    }

    tracing::debug!(poller = name, "Poller stopped");
}

/// Handle to a running poll loop
///
/// Dropping the handle stops the loop.
pub struct PollerHandle<T> {
    list: Arc<RwLock<Vec<T>>>,
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl<T: Clone> PollerHandle<T> {
    /// Cloned snapshot of the current list
    pub async fn snapshot(&self) -> Vec<T> {
        self.list.read().await.clone()
    }
}

impl<T> PollerHandle<T> {
    /// Mutate the held list in place.
    ///
    /// Used for optimistic local updates between polls; the next
    /// successful fetch overwrites whatever this wrote.
    pub async fn apply<F>(&self, f: F)
    where
        F: FnOnce(&mut Vec<T>),
    {
        let mut guard = self.list.write().await;
        f(&mut guard);
    }

    /// Stop polling. Future ticks are cancelled and an in-flight fetch
    /// is discarded.
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Stop and wait for the poll task to exit
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    tracing::error!(error = %e, "Poll task failed during shutdown");
                }
            }
        }
    }
}

impl<T> Drop for PollerHandle<T> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
