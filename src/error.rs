//! Error types for package commit filtering

use std::path::PathBuf;

/// Failure while talking to the version-control backend.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    Git(#[from] git2::Error),

    #[error("commit not found: {0}")]
    CommitNotFound(String),

    #[error("repository at {0} has no working directory")]
    BareRepository(PathBuf),

    #[error("git task failed: {0}")]
    Task(String),
}

/// The package or the repository around it could not be located.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("no package.json or Cargo.toml found in {} or any parent directory", start.display())]
    DescriptorNotFound { start: PathBuf },

    #[error("no git repository found for {}", path.display())]
    RepositoryNotFound {
        path: PathBuf,
        #[source]
        source: SourceError,
    },

    #[error("package directory {} is outside repository root {}", package.display(), root.display())]
    OutsideRepository { package: PathBuf, root: PathBuf },

    #[error("invalid package descriptor {}: {message}", path.display())]
    Descriptor { path: PathBuf, message: String },
}

/// Fetching the changed files of one commit failed.
#[derive(Debug, thiserror::Error)]
#[error("failed to get changed files for commit {hash}")]
pub struct FetchError {
    pub hash: String,
    #[source]
    pub source: SourceError,
}

/// Any failure of a filtering run.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_names_hash() {
        let err = FetchError {
            hash: "abc1234".to_string(),
            source: SourceError::CommitNotFound("abc1234".to_string()),
        };

        assert_eq!(err.to_string(), "failed to get changed files for commit abc1234");

        let filter_err: FilterError = err.into();
        assert!(matches!(filter_err, FilterError::Fetch(ref e) if e.hash == "abc1234"));
    }

    #[test]
    fn test_resolution_error_message() {
        let err = ResolutionError::OutsideRepository {
            package: PathBuf::from("/elsewhere/pkg"),
            root: PathBuf::from("/repo"),
        };

        assert_eq!(
            err.to_string(),
            "package directory /elsewhere/pkg is outside repository root /repo"
        );
    }
}
