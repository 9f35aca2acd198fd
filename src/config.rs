use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Environment variable overriding the fetch concurrency cap.
pub const MAX_THREADS_ENV: &str = "SRM_MAX_THREADS";

/// Older name for [`MAX_THREADS_ENV`], read when the primary name is unset.
pub const MAX_THREADS_ENV_ALIAS: &str = "MONOREPO_MAX_THREADS";

/// Default number of concurrent commit file fetches.
pub const DEFAULT_MAX_THREADS: usize = 500;

/// Upper bound on simultaneous commit file fetches. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcurrencyLimit(NonZeroUsize);

impl ConcurrencyLimit {
    /// Returns `None` for zero.
    pub fn new(limit: usize) -> Option<Self> {
        NonZeroUsize::new(limit).map(Self)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }

    /// Parse an override value. Missing, non-numeric and zero values fall
    /// back to the default.
    pub fn parse(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.trim().parse::<usize>().ok())
            .and_then(Self::new)
            .unwrap_or_default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the override through `lookup`, preferring [`MAX_THREADS_ENV`]
    /// over [`MAX_THREADS_ENV_ALIAS`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = lookup(MAX_THREADS_ENV).or_else(|| lookup(MAX_THREADS_ENV_ALIAS));
        Self::parse(value.as_deref())
    }
}

impl Default for ConcurrencyLimit {
    fn default() -> Self {
        Self(NonZeroUsize::MIN.saturating_add(DEFAULT_MAX_THREADS - 1))
    }
}

/// Settings for a filtering run.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Directory the package descriptor search starts from.
    pub cwd: PathBuf,
    pub concurrency: ConcurrencyLimit,
    /// Replaces the dependency paths declared in the package descriptor.
    pub dependencies: Option<Vec<String>>,
}

impl FilterConfig {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            concurrency: ConcurrencyLimit::default(),
            dependencies: None,
        }
    }

    /// Config for `cwd` with the concurrency cap read from the environment.
    pub fn from_env(cwd: impl Into<PathBuf>) -> Self {
        Self::new(cwd).with_concurrency(ConcurrencyLimit::from_env())
    }

    pub fn with_concurrency(mut self, concurrency: ConcurrencyLimit) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = Some(dependencies);
        self
    }
}
