use tokio::sync::oneshot;

/// Mutation submitted to a credential cache update queue.
pub enum CacheUpdate<K, V> {
    Add(K, V),
    Delete(K),
    /// Resolved once every update queued before it has been applied.
    Flush(oneshot::Sender<()>),
}
