//! Bounded, memoized fan-out of changed-file lookups

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tracing::debug;

use super::cache::CommitFileCache;
use crate::commit::{Commit, CommitWithFiles};
use crate::config::ConcurrencyLimit;
use crate::error::{FetchError, SourceError};
use crate::git::CommitSource;

type Fetched = Result<(usize, CommitWithFiles), FetchError>;

/// Attaches changed files to commits, at most `limit` lookups at a time.
pub struct CommitFileFetcher {
    source: Arc<dyn CommitSource>,
    cache: CommitFileCache,
    limit: ConcurrencyLimit,
}

impl CommitFileFetcher {
    pub fn new(source: Arc<dyn CommitSource>, cache: CommitFileCache, limit: ConcurrencyLimit) -> Self {
        Self { source, cache, limit }
    }

    pub fn cache(&self) -> &CommitFileCache {
        &self.cache
    }

    /// Enrich every commit with its changed files.
    ///
    /// Lookups are admitted in input order and may finish in any order; the
    /// result has one entry per input commit at the same position. The first
    /// failed lookup fails the whole batch and cancels the rest.
    pub async fn with_files(&self, commits: Vec<Commit>) -> Result<Vec<CommitWithFiles>, FetchError> {
        if commits.is_empty() {
            return Ok(Vec::new());
        }

        let total = commits.len();
        let permits = self.limit.get().min(Semaphore::MAX_PERMITS);
        debug!(commits = total, limit = permits, "Fetching changed files");

        let semaphore = Arc::new(Semaphore::new(permits));
        let mut join_set: JoinSet<Fetched> = JoinSet::new();
        let mut slots: Vec<Option<CommitWithFiles>> = (0..total).map(|_| None).collect();

        for (index, commit) in commits.into_iter().enumerate() {
            // Keep draining finished lookups while waiting for a free slot so
            // a failure stops the batch early.
            let permit = loop {
                tokio::select! {
                    biased;
                    permit = admit(&semaphore, &commit.hash) => break permit?,
                    Some(joined) = join_set.join_next(), if !join_set.is_empty() => {
                        store(&mut slots, joined)?;
                    }
                }
            };

            let source = self.source.clone();
            let cache = self.cache.clone();

            join_set.spawn(async move {
                let _permit = permit;
                let fetched = cache
                    .get_or_fetch(&commit.hash, || source.commit_files(&commit.hash))
                    .await;

                match fetched {
                    Ok(files) => Ok((index, CommitWithFiles::new(commit, files))),
                    Err(source) => Err(FetchError {
                        hash: commit.hash,
                        source,
                    }),
                }
            });
        }

        while let Some(joined) = join_set.join_next().await {
            store(&mut slots, joined)?;
        }

        Ok(slots.into_iter().flatten().collect())
    }
}

async fn admit(semaphore: &Arc<Semaphore>, hash: &str) -> Result<OwnedSemaphorePermit, FetchError> {
    semaphore.clone().acquire_owned().await.map_err(|_| FetchError {
        hash: hash.to_string(),
        source: SourceError::Task("fetch pool closed".to_string()),
    })
}

fn store(slots: &mut [Option<CommitWithFiles>], joined: Result<Fetched, JoinError>) -> Result<(), FetchError> {
    match joined {
        Ok(Ok((index, commit))) => {
            slots[index] = Some(commit);
            Ok(())
        }
        Ok(Err(err)) => Err(err),
        // Tasks are only cancelled when the set is dropped, so this is a panic.
        Err(err) => std::panic::resume_unwind(err.into_panic()),
    }
}
