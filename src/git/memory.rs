//! In-memory commit source for tests

use futures::future::{BoxFuture, FutureExt};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::source::CommitSource;
use crate::error::SourceError;

/// Serves fixed file lists and records how it was called.
pub(crate) struct MemorySource {
    root: Option<PathBuf>,
    files: HashMap<String, Vec<String>>,
    delays: HashMap<String, Duration>,
    default_delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MemorySource {
    pub fn new(root: &Path) -> Self {
        Self {
            root: Some(root.to_path_buf()),
            files: HashMap::new(),
            delays: HashMap::new(),
            default_delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn without_root(mut self) -> Self {
        self.root = None;
        self
    }

    pub fn with_commit(mut self, hash: &str, files: &[&str]) -> Self {
        self.files
            .insert(hash.to_string(), files.iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn with_delay_for(mut self, hash: &str, delay: Duration) -> Self {
        self.delays.insert(hash.to_string(), delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl CommitSource for MemorySource {
    fn root(&self) -> BoxFuture<'_, Result<PathBuf, SourceError>> {
        let root = self
            .root
            .clone()
            .ok_or_else(|| SourceError::Task("no repository".to_string()));
        async move { root }.boxed()
    }

    fn commit_files<'a>(&'a self, hash: &'a str) -> BoxFuture<'a, Result<Vec<String>, SourceError>> {
        async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let delay = self.delays.get(hash).copied().unwrap_or(self.default_delay);
            if delay.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.files
                .get(hash)
                .cloned()
                .ok_or_else(|| SourceError::CommitNotFound(hash.to_string()))
        }
        .boxed()
    }
}
