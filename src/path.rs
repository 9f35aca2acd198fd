//! Repository-relative paths as segment lists

use std::fmt;
use std::path::{Component, Path};

/// A repository-relative path split into normalized segments.
///
/// Both `/` and `\` separate segments. Empty and `.` segments are dropped and
/// `..` removes the preceding segment. A `..` that would climb above the
/// repository root is kept, so such a path can never contain a real file.
///
/// The empty segment list is the repository root and contains every path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Segments(Vec<String>);

impl Segments {
    /// Parse a slash- or backslash-separated relative path.
    pub fn parse(path: &str) -> Self {
        let mut segments = Vec::new();
        for part in path.split(['/', '\\']) {
            push_segment(&mut segments, part);
        }
        Self(segments)
    }

    /// Build segments from a filesystem path, ignoring any root or prefix.
    pub fn from_path(path: &Path) -> Self {
        let mut segments = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(part) => push_segment(&mut segments, &part.to_string_lossy()),
                Component::ParentDir => push_segment(&mut segments, ".."),
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            }
        }
        Self(segments)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every segment of `self` equals the segment of `other` at the
    /// same position, i.e. `other` is `self` or lies below it.
    pub fn contains(&self, other: &Segments) -> bool {
        self.0.len() <= other.0.len() && self.0.iter().zip(&other.0).all(|(a, b)| a == b)
    }
}

fn push_segment(segments: &mut Vec<String>, part: &str) {
    match part {
        "" | "." => {}
        ".." => match segments.last() {
            Some(last) if last != ".." => {
                segments.pop();
            }
            _ => segments.push("..".to_string()),
        },
        _ => segments.push(part.to_string()),
    }
}

impl fmt::Display for Segments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}
