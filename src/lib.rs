//! monorepo-commits - package-scoped commit filtering
//!
//! Keeps only the commits that touch one package of a monorepo:
//! - Package root located from the nearest `package.json` or `Cargo.toml`
//! - Changed files per commit fetched through git with a concurrency cap
//! - Per-hash memoization of changed files
//! - Segment-prefix matching against the package and its declared dependencies

pub mod commit;
pub mod config;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod git;
pub mod matcher;
pub mod package;
pub mod path;
pub mod release;

pub use commit::{Commit, CommitWithFiles};
pub use config::{ConcurrencyLimit, FilterConfig};
pub use error::{FetchError, FilterError, ResolutionError, SourceError};
pub use fetch::{CommitFileCache, CommitFileFetcher};
pub use filter::{CommitFilter, FilterOutcome};
pub use git::{CommitRange, CommitSource, GitRepository};
pub use matcher::{is_relevant, Relevance, RelevanceMatcher};
pub use package::{resolve_package_path, PackageDescriptor, ResolvedPackage};
pub use path::Segments;
pub use release::{with_only_package_commits, PackageReleaseContext, ReleaseContext};
