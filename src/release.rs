//! Scope a release step to a single package's commits

use std::future::Future;

use crate::commit::{Commit, CommitWithFiles};
use crate::error::FilterError;
use crate::filter::CommitFilter;

/// What a release step is given: the commits since the last release.
#[derive(Debug, Clone, Default)]
pub struct ReleaseContext {
    /// Tag or commit of the previous release, if there was one.
    pub last_release: Option<String>,
    pub commits: Vec<Commit>,
}

/// A release context whose commits all touch the package.
#[derive(Debug, Clone)]
pub struct PackageReleaseContext {
    pub last_release: Option<String>,
    pub package_name: String,
    pub commits: Vec<CommitWithFiles>,
}

impl PackageReleaseContext {
    /// True when the package has nothing to release.
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

/// Replace the context's commits with the ones relevant to the package.
pub async fn scope_context(
    filter: &CommitFilter,
    context: ReleaseContext,
) -> Result<PackageReleaseContext, FilterError> {
    let outcome = filter.filter_commits(context.commits).await?;

    Ok(PackageReleaseContext {
        last_release: context.last_release,
        package_name: outcome.package_name,
        commits: outcome.commits,
    })
}

/// Run `step` with a context that only holds the package's commits.
///
/// The step never runs when filtering fails.
pub async fn with_only_package_commits<F, Fut, T>(
    filter: &CommitFilter,
    context: ReleaseContext,
    step: F,
) -> Result<T, FilterError>
where
    F: FnOnce(PackageReleaseContext) -> Fut,
    Fut: Future<Output = T>,
{
    let scoped = scope_context(filter, context).await?;
    Ok(step(scoped).await)
}
