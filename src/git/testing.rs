//! Throwaway repositories for tests

use git2::{IndexAddOption, Repository, Signature};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub(crate) struct TestRepo {
    dir: TempDir,
    repo: Repository,
}

impl TestRepo {
    pub fn init() -> Self {
        Self::with_dir(tempfile::tempdir().unwrap())
    }

    /// Repository under `base`; `path()` keeps `base`'s form, so a relative
    /// `base` gives a relative repository path.
    pub fn init_in(base: &Path) -> Self {
        Self::with_dir(tempfile::Builder::new().prefix(".repo").tempdir_in(base).unwrap())
    }

    fn with_dir(dir: TempDir) -> Self {
        let repo = Repository::init(dir.path()).unwrap();
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file in the working tree without committing it.
    pub fn write(&self, path: &str, contents: &str) {
        let full = self.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, contents).unwrap();
    }

    /// Write `files` and commit the whole working tree. Returns the commit hash.
    pub fn commit(&self, message: &str, files: &[(&str, &str)]) -> String {
        for (path, contents) in files {
            self.write(path, contents);
        }
        self.commit_all(message)
    }

    pub fn remove(&self, message: &str, path: &str) -> String {
        fs::remove_file(self.path().join(path)).unwrap();
        self.commit_all(message)
    }

    fn commit_all(&self, message: &str) -> String {
        let mut index = self.repo.index().unwrap();
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None).unwrap();
        index.update_all(["*"].iter(), None).unwrap();
        index.write().unwrap();

        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let signature = Signature::now("Test", "test@example.com").unwrap();
        let parent = self.repo.head().ok().and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .unwrap()
            .to_string()
    }
}
