//! Glob matching of file set keys against the configured patterns.

use globset::{
    Glob,
    GlobBuilder,
    GlobSet,
    GlobSetBuilder,
};

#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to build glob set: {0}")]
    GlobSetBuild(#[from] globset::Error),
}

/// Compiles a single pattern with standard, case-sensitive glob semantics:
/// `*` stays within one path segment and `**` crosses separators.
pub(super) fn build_glob(pattern: &str) -> Result<Glob, globset::Error> {
    GlobBuilder::new(pattern).literal_separator(true).build()
}

/// Matches file set keys against configured glob patterns.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    patterns: Vec<String>,
    set: GlobSet,
}

impl PatternMatcher {
    /// Creates a matcher accepting a key when any of `patterns` matches.
    pub fn new(patterns: &[String]) -> Result<Self, MatcherError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = build_glob(pattern).map_err(|source| MatcherError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }

        Ok(Self { patterns: patterns.to_vec(), set: builder.build()? })
    }

    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Returns true if the relative key matches any pattern.
    #[must_use]
    pub fn is_match(&self, key: &str) -> bool {
        self.set.is_match(key)
    }
}
