//! Package descriptors: `package.json` and `Cargo.toml`

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ResolutionError;
use crate::path::Segments;

pub const PACKAGE_JSON: &str = "package.json";
pub const CARGO_TOML: &str = "Cargo.toml";

/// Which file format described the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    PackageJson,
    CargoToml,
}

/// The nearest package descriptor and the release settings it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    pub kind: DescriptorKind,
    /// Path of the descriptor file itself.
    pub path: PathBuf,
    pub name: Option<String>,
    /// `release.monorepo.dependencies`, as written.
    pub dependencies: Vec<String>,
}

#[derive(Deserialize)]
struct PackageJson {
    name: Option<String>,
    #[serde(default)]
    release: serde_json::Value,
}

impl PackageDescriptor {
    /// Walk up from `start` (inclusive) and load the first descriptor found.
    ///
    /// `package.json` is preferred over `Cargo.toml` in the same directory.
    /// A `Cargo.toml` without a `[package]` table, such as a virtual
    /// workspace manifest, is not a package and the search continues above it.
    /// A relative `start` is taken relative to the process working directory.
    pub fn discover(start: &Path) -> Result<Self, ResolutionError> {
        let absolute = std::env::current_dir()
            .map(|cwd| cwd.join(start))
            .map_err(|_| ResolutionError::DescriptorNotFound {
                start: start.to_path_buf(),
            })?;

        for dir in absolute.ancestors() {
            let package_json = dir.join(PACKAGE_JSON);
            if package_json.is_file() {
                return Self::load(&package_json);
            }

            let cargo_toml = dir.join(CARGO_TOML);
            if cargo_toml.is_file() {
                if let Some(descriptor) = Self::load_cargo_toml(&cargo_toml)? {
                    return Ok(descriptor);
                }
            }
        }

        Err(ResolutionError::DescriptorNotFound {
            start: start.to_path_buf(),
        })
    }

    /// Load a descriptor file, choosing the format by file name.
    pub fn load(path: &Path) -> Result<Self, ResolutionError> {
        if path.file_name().is_some_and(|name| name == CARGO_TOML) {
            return Self::load_cargo_toml(path)?.ok_or_else(|| ResolutionError::Descriptor {
                path: path.to_path_buf(),
                message: "missing [package] table".to_string(),
            });
        }

        let content = read(path)?;
        let parsed: PackageJson =
            serde_json::from_str(&content).map_err(|e| descriptor_error(path, e))?;

        Ok(Self {
            kind: DescriptorKind::PackageJson,
            path: path.to_path_buf(),
            name: parsed.name,
            dependencies: string_list(parsed.release.pointer("/monorepo/dependencies")),
        })
    }

    fn load_cargo_toml(path: &Path) -> Result<Option<Self>, ResolutionError> {
        let content = read(path)?;
        let manifest: toml::Table = toml::from_str(&content).map_err(|e| descriptor_error(path, e))?;

        let Some(package) = manifest.get("package").and_then(|p| p.as_table()) else {
            return Ok(None);
        };

        let dependencies = package
            .get("metadata")
            .and_then(|m| m.get("release"))
            .and_then(|r| r.get("monorepo"))
            .and_then(|m| m.get("dependencies"))
            .and_then(|d| d.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Some(Self {
            kind: DescriptorKind::CargoToml,
            path: path.to_path_buf(),
            name: package.get("name").and_then(|n| n.as_str()).map(str::to_string),
            dependencies,
        }))
    }

    /// Directory holding the descriptor, i.e. the package root.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Name for log output; falls back to the directory name.
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.dir()
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "root".to_string())
        })
    }

    pub fn dependency_paths(&self) -> Vec<Segments> {
        self.dependencies.iter().map(|d| Segments::parse(d)).collect()
    }
}

fn read(path: &Path) -> Result<String, ResolutionError> {
    fs::read_to_string(path).map_err(|e| descriptor_error(path, e))
}

fn descriptor_error(path: &Path, err: impl std::fmt::Display) -> ResolutionError {
    ResolutionError::Descriptor {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Anything but an array yields nothing; non-string entries are skipped.
fn string_list(value: Option<&serde_json::Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
