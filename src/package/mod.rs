//! Package lookup
//!
//! Provides:
//! - Package descriptor discovery (`package.json`, `Cargo.toml`)
//! - Release dependency declarations
//! - Package path resolution against the repository root

pub mod descriptor;
pub mod resolver;

pub use descriptor::{DescriptorKind, PackageDescriptor};
pub use resolver::{resolve_package_path, ResolvedPackage};
