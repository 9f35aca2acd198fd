//! Decide whether a changed file belongs to the package or its dependencies

use crate::path::Segments;

/// Why a file counts as relevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relevance {
    /// The file is under the package itself.
    Package,
    /// The file is under the dependency path at this index.
    Dependency(usize),
}

/// Matches files against a package path and its dependency paths.
#[derive(Debug, Clone)]
pub struct RelevanceMatcher {
    package: Segments,
    dependencies: Vec<Segments>,
}

impl RelevanceMatcher {
    pub fn new(package: Segments, dependencies: Vec<Segments>) -> Self {
        Self { package, dependencies }
    }

    pub fn package(&self) -> &Segments {
        &self.package
    }

    pub fn dependencies(&self) -> &[Segments] {
        &self.dependencies
    }

    /// Package matches take precedence over dependency matches.
    pub fn relevance(&self, file: &str) -> Option<Relevance> {
        let file = Segments::parse(file);

        if self.package.contains(&file) {
            return Some(Relevance::Package);
        }

        self.dependencies
            .iter()
            .position(|dependency| dependency.contains(&file))
            .map(Relevance::Dependency)
    }

    pub fn is_relevant(&self, file: &str) -> bool {
        self.relevance(file).is_some()
    }

    /// First relevant file in the given order, if any.
    pub fn first_relevant<'a>(&self, files: &'a [String]) -> Option<(&'a str, Relevance)> {
        files
            .iter()
            .find_map(|file| self.relevance(file).map(|relevance| (file.as_str(), relevance)))
    }
}

/// Check one file against a package path and dependency paths.
pub fn is_relevant(file: &str, package: &Segments, dependencies: &[Segments]) -> bool {
    let file = Segments::parse(file);
    package.contains(&file) || dependencies.iter().any(|dependency| dependency.contains(&file))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(package: &str, dependencies: &[&str]) -> RelevanceMatcher {
        RelevanceMatcher::new(
            Segments::parse(package),
            dependencies.iter().map(|d| Segments::parse(d)).collect(),
        )
    }

    #[test]
    fn test_package_file_is_relevant() {
        let m = matcher("packages/core", &[]);
        assert_eq!(m.relevance("packages/core/index.js"), Some(Relevance::Package));
        assert!(!m.is_relevant("packages/utils/helper.js"));
    }

    #[test]
    fn test_dependency_file_is_relevant() {
        let m = matcher("packages/core", &["packages/utils", "packages/shared"]);
        assert_eq!(m.relevance("packages/shared/types.js"), Some(Relevance::Dependency(1)));
        assert!(!m.is_relevant("packages/web/app.js"));
    }

    #[test]
    fn test_sibling_with_common_prefix_is_not_relevant() {
        let m = matcher("packages/foo", &[]);
        assert!(!m.is_relevant("packages/foo-extra/index.js"));
        assert!(!m.is_relevant("packages/foo.js"));
    }

    #[test]
    fn test_shorter_file_path_never_matches() {
        let m = matcher("packages/core/src", &[]);
        assert!(!m.is_relevant("packages/core"));
        assert!(!m.is_relevant("packages"));
    }

    #[test]
    fn test_root_package_matches_everything() {
        let m = matcher("", &[]);
        assert!(m.is_relevant("README.md"));
        assert!(m.is_relevant("packages/anything/deep/file.rs"));
    }

    #[test]
    fn test_first_relevant_keeps_file_order() {
        let m = matcher("packages/core", &["packages/shared"]);
        let files = vec![
            "docs/readme.md".to_string(),
            "packages/shared/a.js".to_string(),
            "packages/core/b.js".to_string(),
        ];

        assert_eq!(
            m.first_relevant(&files),
            Some(("packages/shared/a.js", Relevance::Dependency(0)))
        );
        assert_eq!(m.first_relevant(&files[..1]), None);
    }

    #[test]
    fn test_free_function_agrees_with_matcher() {
        let package = Segments::parse("packages/core");
        let dependencies = vec![Segments::parse("packages/shared")];

        assert!(is_relevant("packages/core/index.js", &package, &dependencies));
        assert!(is_relevant("packages\\shared\\types.js", &package, &dependencies));
        assert!(!is_relevant("packages/utils/helper.js", &package, &dependencies));
    }
}
