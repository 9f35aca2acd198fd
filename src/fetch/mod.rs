//! Changed-file fetching
//!
//! Provides:
//! - A per-hash memo of changed files
//! - Bounded concurrent lookups with stable output order

pub mod cache;
pub mod fetcher;

pub use cache::CommitFileCache;
pub use fetcher::CommitFileFetcher;
