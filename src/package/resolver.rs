//! Locate the package root relative to the repository root

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::descriptor::PackageDescriptor;
use crate::error::ResolutionError;
use crate::git::CommitSource;
use crate::path::Segments;

/// The package a filtering run is scoped to.
#[derive(Debug, Clone)]
pub struct ResolvedPackage {
    pub descriptor: PackageDescriptor,
    /// Repository working tree root.
    pub root: PathBuf,
    /// Package directory relative to `root`.
    pub path: Segments,
}

impl ResolvedPackage {
    pub fn name(&self) -> String {
        self.descriptor.display_name()
    }
}

/// Find the nearest package descriptor above `cwd` and express its directory
/// relative to the repository root reported by `source`.
pub async fn resolve_package_path(
    cwd: &Path,
    source: &dyn CommitSource,
) -> Result<ResolvedPackage, ResolutionError> {
    let descriptor = PackageDescriptor::discover(cwd)?;
    let root = source
        .root()
        .await
        .map_err(|source| ResolutionError::RepositoryNotFound {
            path: cwd.to_path_buf(),
            source,
        })?;

    let path = relative_segments(descriptor.dir(), &root)?;
    debug!(
        package = %descriptor.display_name(),
        path = %path,
        root = %root.display(),
        "Resolved package path"
    );

    Ok(ResolvedPackage {
        descriptor,
        root,
        path,
    })
}

/// `package` relative to `root`, comparing canonical forms so symlinked
/// temp dirs and trailing separators do not matter.
fn relative_segments(package: &Path, root: &Path) -> Result<Segments, ResolutionError> {
    let package = canonical(package);
    let root = canonical(root);

    let relative = package.strip_prefix(&root).ok().map(Segments::from_path);
    relative.ok_or(ResolutionError::OutsideRepository { package, root })
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
