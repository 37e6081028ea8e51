use crate::{cache::CacheUpdate, config::CacheConfig};
use anyhow::Context;
use futures::future::BoxFuture;
use std::{borrow::Borrow, collections::HashMap, hash::Hash, sync::Arc, time::Duration};
use tokio::{
    sync::{Mutex, RwLock, mpsc, oneshot},
    time::MissedTickBehavior,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// In-memory mirror of a relational store table.
///
/// The map is only mutated by two background tasks: the update worker, that applies `Add` and
/// `Delete` requests in submission order, and the refresh worker, that periodically replaces the
/// whole map with a fresh copy. Both workers hold the writer guard while they mutate, and the
/// refresh worker holds it from the start of the reload until the swap, so an update is never
/// applied to a map that is about to be replaced. Lookups only take the shared read lock and never
/// wait on a reload.
#[derive(Clone)]
pub struct CredentialCache<K, V> {
    name: &'static str,
    entries: Arc<RwLock<HashMap<K, V>>>,
    updates: mpsc::Sender<CacheUpdate<K, V>>,
}

impl<K, V> CredentialCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Loads the cache and starts its workers. Fails if the initial load fails. Both workers stop
    /// when `shutdown` is cancelled.
    pub async fn start<L>(
        name: &'static str,
        loader: L,
        config: &CacheConfig,
        shutdown: CancellationToken,
    ) -> anyhow::Result<Self>
    where
        L: Fn() -> BoxFuture<'static, anyhow::Result<HashMap<K, V>>> + Send + Sync + 'static,
    {
        let initial_entries = loader()
            .await
            .with_context(|| format!("Failed to load {name} cache."))?;
        info!(cache = name, entries = initial_entries.len(), "Cache is loaded.");

        let entries = Arc::new(RwLock::new(initial_entries));
        let writer = Arc::new(Mutex::new(()));
        let (updates, updates_receiver) = mpsc::channel(config.update_queue_capacity.max(1));

        tokio::spawn(process_updates(
            name,
            entries.clone(),
            writer.clone(),
            updates_receiver,
            shutdown.clone(),
        ));
        tokio::spawn(refresh(
            name,
            entries.clone(),
            writer,
            loader,
            config.refresh_interval.max(Duration::from_millis(1)),
            shutdown,
        ));

        Ok(Self {
            name,
            entries,
            updates,
        })
    }

    /// Returns a copy of the entry with the given key, if any.
    pub async fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.read().await.get(key).cloned()
    }

    /// Queues insertion (or replacement) of an entry.
    pub async fn add(&self, key: K, value: V) {
        self.submit(CacheUpdate::Add(key, value)).await;
    }

    /// Queues removal of an entry.
    pub async fn delete(&self, key: K) {
        self.submit(CacheUpdate::Delete(key)).await;
    }

    /// Waits until every update queued so far has been applied.
    pub async fn flush(&self) {
        let (sender, receiver) = oneshot::channel();
        self.submit(CacheUpdate::Flush(sender)).await;
        if receiver.await.is_err() {
            warn!(cache = self.name, "Cache stopped before pending updates were applied.");
        }
    }

    async fn submit(&self, update: CacheUpdate<K, V>) {
        if self.updates.send(update).await.is_err() {
            warn!(cache = self.name, "Cache update queue is closed, update is dropped.");
        }
    }
}

async fn process_updates<K: Eq + Hash, V>(
    name: &'static str,
    entries: Arc<RwLock<HashMap<K, V>>>,
    writer: Arc<Mutex<()>>,
    mut updates: mpsc::Receiver<CacheUpdate<K, V>>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                updates.close();
                break;
            }
            update = updates.recv() => match update {
                Some(CacheUpdate::Add(key, value)) => {
                    let _writer = writer.lock().await;
                    entries.write().await.insert(key, value);
                }
                Some(CacheUpdate::Delete(key)) => {
                    let _writer = writer.lock().await;
                    entries.write().await.remove(&key);
                }
                Some(CacheUpdate::Flush(sender)) => {
                    sender.send(()).ok();
                }
                None => break,
            }
        }
    }

    info!(cache = name, "Cache update worker is stopped.");
}

async fn refresh<K, V, L>(
    name: &'static str,
    entries: Arc<RwLock<HashMap<K, V>>>,
    writer: Arc<Mutex<()>>,
    loader: L,
    refresh_interval: Duration,
    shutdown: CancellationToken,
) where
    L: Fn() -> BoxFuture<'static, anyhow::Result<HashMap<K, V>>>,
{
    let mut ticker = tokio::time::interval(refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately and the initial load has already happened.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                let _writer = writer.lock().await;
                match loader().await {
                    Ok(fresh_entries) => {
                        let size = fresh_entries.len();
                        *entries.write().await = fresh_entries;
                        debug!(cache = name, entries = size, "Cache is refreshed.");
                    }
                    Err(err) => {
                        error!(
                            cache = name,
                            "Failed to refresh cache, keeping stale entries: {err:?}"
                        );
                    }
                }
            }
        }
    }

    info!(cache = name, "Cache refresh worker is stopped.");
}
