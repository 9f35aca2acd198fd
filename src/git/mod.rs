//! Git operations module
//!
//! Provides:
//! - The `CommitSource` backend trait
//! - Changed files per commit via git2
//! - Commit listing

pub mod commits;
pub mod repository;
pub mod source;

#[cfg(test)]
pub(crate) mod memory;
#[cfg(test)]
pub(crate) mod testing;

pub use commits::CommitRange;
pub use repository::GitRepository;
pub use source::CommitSource;
