//! Version-control backend used by the filter

use futures::future::BoxFuture;
use std::path::PathBuf;

use crate::error::SourceError;

/// Where repository metadata and per-commit changed files come from.
///
/// Implementations must be cheap to call concurrently; the fetcher issues
/// many `commit_files` calls at once.
pub trait CommitSource: Send + Sync {
    /// Absolute path of the repository's working tree root.
    fn root(&self) -> BoxFuture<'_, Result<PathBuf, SourceError>>;

    /// Repository-relative paths changed by `hash`, in backend order.
    fn commit_files<'a>(&'a self, hash: &'a str) -> BoxFuture<'a, Result<Vec<String>, SourceError>>;
}
