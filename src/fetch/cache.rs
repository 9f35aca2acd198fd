//! Memoized changed-file lists keyed by commit hash

use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;

type Files = Arc<Vec<String>>;

/// Shared memo of commit hash → changed files.
///
/// Clones share the same storage. Entries are filled at most once and never
/// invalidated; a commit's file list does not change for a given hash.
/// Concurrent lookups of the same hash wait for the first fetch instead of
/// issuing their own. A failed fetch leaves the entry empty so a later call
/// tries again.
#[derive(Debug, Clone, Default)]
pub struct CommitFileCache {
    entries: Arc<DashMap<String, Arc<OnceCell<Files>>>>,
}

impl CommitFileCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, hash: &str) -> Option<Files> {
        self.entries.get(hash).and_then(|slot| slot.get().cloned())
    }

    /// Return the cached files for `hash`, running `fetch` on a miss.
    pub async fn get_or_fetch<F, Fut, E>(&self, hash: &str, fetch: F) -> Result<Files, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<String>, E>>,
    {
        // The map guard must be released before awaiting.
        let slot = self.entries.entry(hash.to_string()).or_default().clone();

        let files = slot
            .get_or_try_init(|| async move { fetch().await.map(Arc::new) })
            .await?;

        Ok(Arc::clone(files))
    }

    /// Number of hashes with a stored file list.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|entry| entry.value().initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
