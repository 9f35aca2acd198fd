//! Commit listing for the command line

use chrono::{TimeZone, Utc};
use git2::Repository;

use super::repository::GitRepository;
use crate::commit::Commit;
use crate::error::SourceError;

/// Which commits to list, newest first.
#[derive(Debug, Clone, Default)]
pub struct CommitRange {
    /// Exclude this reference and everything reachable from it.
    pub since: Option<String>,
    pub limit: Option<usize>,
}

impl GitRepository {
    /// Walk from HEAD, newest first.
    pub fn list_commits(&self, range: &CommitRange) -> Result<Vec<Commit>, SourceError> {
        let repo = self.open()?;

        let mut revwalk = repo.revwalk()?;
        revwalk.push_head()?;

        if let Some(since) = range.since.as_deref() {
            let since_commit = repo.revparse_single(since)?.peel_to_commit()?;
            revwalk.hide(since_commit.id())?;
        }

        let mut commits = Vec::new();
        for oid in revwalk.take(range.limit.unwrap_or(usize::MAX)) {
            commits.push(to_commit(&repo, oid?)?);
        }

        Ok(commits)
    }
}

fn to_commit(repo: &Repository, oid: git2::Oid) -> Result<Commit, SourceError> {
    let commit = repo.find_commit(oid)?;
    let author = commit.author();
    let timestamp = Utc.timestamp_opt(commit.time().seconds(), 0).single();

    let mut record = Commit::from_message(oid.to_string(), commit.message().unwrap_or(""));
    record.author = author.name().map(str::to_string);
    record.timestamp = timestamp;

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::testing::TestRepo;

    #[test]
    fn test_list_commits_newest_first() {
        let repo = TestRepo::init();
        let first = repo.commit("feat: first\n\nbody text", &[("a.txt", "1")]);
        let second = repo.commit("fix: second", &[("a.txt", "2")]);

        let git = GitRepository::new(repo.path());
        let commits = git.list_commits(&CommitRange::default()).unwrap();

        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].hash, second);
        assert_eq!(commits[1].hash, first);
        assert_eq!(commits[1].subject, "feat: first");
        assert_eq!(commits[1].body.as_deref(), Some("body text"));
        assert_eq!(commits[0].author.as_deref(), Some("Test"));
        assert!(commits[0].timestamp.is_some());
    }

    #[test]
    fn test_list_commits_since_and_limit() {
        let repo = TestRepo::init();
        let first = repo.commit("one", &[("a.txt", "1")]);
        repo.commit("two", &[("a.txt", "2")]);
        let third = repo.commit("three", &[("a.txt", "3")]);

        let git = GitRepository::new(repo.path());

        let since = CommitRange {
            since: Some(first),
            limit: None,
        };
        let subjects: Vec<_> = git
            .list_commits(&since)
            .unwrap()
            .into_iter()
            .map(|c| c.subject)
            .collect();
        assert_eq!(subjects, vec!["three", "two"]);

        let limited = CommitRange {
            since: None,
            limit: Some(1),
        };
        let commits = git.list_commits(&limited).unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].hash, third);
    }
}
