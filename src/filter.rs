//! Reduce a commit list to the commits that touch one package

use std::sync::Arc;
use tracing::{debug, info};

use crate::commit::{Commit, CommitWithFiles};
use crate::config::FilterConfig;
use crate::error::{FilterError, ResolutionError};
use crate::fetch::{CommitFileCache, CommitFileFetcher};
use crate::git::CommitSource;
use crate::matcher::{Relevance, RelevanceMatcher};
use crate::package::{resolve_package_path, ResolvedPackage};
use crate::path::Segments;

/// Result of a filtering run.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub package_name: String,
    pub package_path: Segments,
    /// Retained commits, in input order.
    pub commits: Vec<CommitWithFiles>,
}

/// Filters commits for the package found around `config.cwd`.
pub struct CommitFilter {
    source: Arc<dyn CommitSource>,
    cache: CommitFileCache,
    config: FilterConfig,
}

impl CommitFilter {
    /// A filter with its own, empty file cache.
    pub fn new(source: Arc<dyn CommitSource>, config: FilterConfig) -> Self {
        Self {
            source,
            cache: CommitFileCache::new(),
            config,
        }
    }

    /// Share a file cache with other filters or earlier runs.
    pub fn with_cache(mut self, cache: CommitFileCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &CommitFileCache {
        &self.cache
    }

    pub async fn resolve(&self) -> Result<ResolvedPackage, ResolutionError> {
        resolve_package_path(&self.config.cwd, self.source.as_ref()).await
    }

    /// Matcher for the resolved package; configured dependency overrides
    /// replace the descriptor's list.
    pub fn matcher_for(&self, package: &ResolvedPackage) -> RelevanceMatcher {
        let dependencies = match &self.config.dependencies {
            Some(dependencies) => dependencies.iter().map(|d| Segments::parse(d)).collect(),
            None => package.descriptor.dependency_paths(),
        };
        RelevanceMatcher::new(package.path.clone(), dependencies)
    }

    pub async fn filter_commits(&self, commits: Vec<Commit>) -> Result<FilterOutcome, FilterError> {
        let package = self.resolve().await?;
        let matcher = self.matcher_for(&package);

        debug!(
            package_path = %matcher.package(),
            dependencies = ?matcher.dependencies().iter().map(ToString::to_string).collect::<Vec<_>>(),
            "Filter commits by package path and dependencies"
        );

        let fetcher = CommitFileFetcher::new(self.source.clone(), self.cache.clone(), self.config.concurrency);
        let enriched = fetcher.with_files(commits).await?;
        let commits = retain_relevant(&matcher, enriched);

        let package_name = package.name();
        info!(
            count = commits.len(),
            package = %package_name,
            "Found {} commits for package {} since last release",
            commits.len(),
            package_name
        );

        Ok(FilterOutcome {
            package_name,
            package_path: package.path,
            commits,
        })
    }
}

/// Keep commits with at least one relevant file, preserving order.
pub fn retain_relevant(matcher: &RelevanceMatcher, commits: Vec<CommitWithFiles>) -> Vec<CommitWithFiles> {
    commits
        .into_iter()
        .filter(|commit| match matcher.first_relevant(&commit.files) {
            Some((file, Relevance::Package)) => {
                debug!(
                    "Including commit \"{}\" because it modified package file \"{}\".",
                    commit.subject(),
                    file
                );
                true
            }
            Some((file, Relevance::Dependency(index))) => {
                debug!(
                    dependency = %matcher.dependencies()[index],
                    "Including commit \"{}\" because it modified dependency file \"{}\".",
                    commit.subject(),
                    file
                );
                true
            }
            None => false,
        })
        .collect()
}
