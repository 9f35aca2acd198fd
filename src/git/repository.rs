//! git2-backed commit source

use futures::future::{BoxFuture, FutureExt};
use git2::{DiffOptions, ErrorCode, Repository};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use super::source::CommitSource;
use crate::error::SourceError;

/// A git repository discovered from a starting directory.
///
/// git2 handles are not `Sync`, so every operation opens its own handle; the
/// discovered `.git` location is remembered after the first lookup.
#[derive(Debug, Clone)]
pub struct GitRepository {
    start: PathBuf,
    git_dir: Arc<OnceLock<PathBuf>>,
}

impl GitRepository {
    /// Nothing is opened until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            start: path.into(),
            git_dir: Arc::new(OnceLock::new()),
        }
    }

    pub fn open(&self) -> Result<Repository, SourceError> {
        if let Some(git_dir) = self.git_dir.get() {
            return Ok(Repository::open(git_dir)?);
        }

        let repo = Repository::discover(&self.start)?;
        let _ = self.git_dir.set(repo.path().to_path_buf());
        Ok(repo)
    }

    /// Working tree root
    pub fn workdir(&self) -> Result<PathBuf, SourceError> {
        let repo = self.open()?;
        repo.workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| SourceError::BareRepository(repo.path().to_path_buf()))
    }

    /// Files changed by a commit relative to its first parent.
    ///
    /// Root commits are compared against the empty tree. Renames report the
    /// new path followed by the old one. Order follows the diff and each path
    /// appears once.
    pub fn changed_files(&self, hash: &str) -> Result<Vec<String>, SourceError> {
        let repo = self.open()?;

        let object = match repo.revparse_single(hash) {
            Ok(object) => object,
            Err(e) if e.code() == ErrorCode::NotFound => {
                return Err(SourceError::CommitNotFound(hash.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let commit = object.peel_to_commit()?;
        let new_tree = commit.tree()?;
        let old_tree = match commit.parent_count() {
            0 => None,
            _ => Some(commit.parent(0)?.tree()?),
        };

        let mut diff_opts = DiffOptions::new();
        let diff = repo.diff_tree_to_tree(old_tree.as_ref(), Some(&new_tree), Some(&mut diff_opts))?;

        let mut seen: HashSet<String> = HashSet::new();
        let mut files = Vec::new();
        for delta in diff.deltas() {
            for path in [delta.new_file().path(), delta.old_file().path()].into_iter().flatten() {
                let path = path.to_string_lossy().to_string();
                if seen.insert(path.clone()) {
                    files.push(path);
                }
            }
        }

        Ok(files)
    }
}

async fn blocking<T, F>(f: F) -> Result<T, SourceError>
where
    F: FnOnce() -> Result<T, SourceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| SourceError::Task(e.to_string()))?
}

impl CommitSource for GitRepository {
    fn root(&self) -> BoxFuture<'_, Result<PathBuf, SourceError>> {
        let repo = self.clone();
        blocking(move || repo.workdir()).boxed()
    }

    fn commit_files<'a>(&'a self, hash: &'a str) -> BoxFuture<'a, Result<Vec<String>, SourceError>> {
        let repo = self.clone();
        let hash = hash.to_string();
        blocking(move || repo.changed_files(&hash)).boxed()
    }
}
