//! Source-file selection for SATD mining.
//!
//! Keeps only files the comment extractor understands and, for the
//! modified-files views, drops paths matching the exclude patterns (test
//! directories by default).

use std::path::Path;

use satd_core::{MiningConfig, SatdError};

/// Decides which repository paths take part in mining.
///
/// # Examples
///
/// ```
/// use satd_difflens::filter::SourceFilter;
///
/// let filter = SourceFilter::default_filter();
/// assert!(filter.is_candidate("src/main/java/Foo.java"));
/// assert!(!filter.is_candidate("src/test/java/FooTest.java"));
/// assert!(!filter.is_candidate("README.md"));
/// ```
#[derive(Debug, Clone)]
pub struct SourceFilter {
    extensions: Vec<String>,
    exclude_patterns: Vec<glob::Pattern>,
}

impl SourceFilter {
    /// Java sources, test directories excluded.
    pub fn default_filter() -> Self {
        Self::from_config(&MiningConfig::default())
            .unwrap_or_else(|_| Self::new(vec!["java".into()], Vec::new()))
    }

    /// Create a filter from mining configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SatdError::Config`] if an exclude pattern is not a valid glob.
    ///
    /// # Examples
    ///
    /// ```
    /// use satd_core::MiningConfig;
    /// use satd_difflens::filter::SourceFilter;
    ///
    /// let config = MiningConfig {
    ///     exclude_patterns: vec!["generated/**".into()],
    ///     ..MiningConfig::default()
    /// };
    /// let filter = SourceFilter::from_config(&config).unwrap();
    /// assert!(filter.is_excluded("generated/Api.java"));
    /// assert!(!filter.is_excluded("src/test/java/FooTest.java"));
    /// ```
    pub fn from_config(config: &MiningConfig) -> Result<Self, SatdError> {
        let mut exclude_patterns = Vec::new();
        for pat in &config.exclude_patterns {
            let pattern = glob::Pattern::new(pat)
                .map_err(|e| SatdError::Config(format!("invalid exclude pattern '{pat}': {e}")))?;
            exclude_patterns.push(pattern);
        }
        Ok(Self::new(config.extensions.clone(), exclude_patterns))
    }

    fn new(extensions: Vec<String>, exclude_patterns: Vec<glob::Pattern>) -> Self {
        let extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_string())
            .collect();
        Self {
            extensions,
            exclude_patterns,
        }
    }

    /// `true` if the extension is one the extractor understands.
    pub fn is_source(&self, path: &str) -> bool {
        Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    /// `true` if the path matches an exclude pattern.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.matching_pattern(path).is_some()
    }

    /// Source file that is not excluded.
    pub fn is_candidate(&self, path: &str) -> bool {
        self.is_source(path) && !self.is_excluded(path)
    }

    /// Split `paths` into candidates and skipped files with reasons.
    ///
    /// # Examples
    ///
    /// ```
    /// use satd_difflens::filter::{SkipReason, SourceFilter};
    ///
    /// let filter = SourceFilter::default_filter();
    /// let result = filter.filter(vec![
    ///     "src/Foo.java".to_string(),
    ///     "build.gradle".to_string(),
    ///     "src/test/FooTest.java".to_string(),
    /// ]);
    /// assert_eq!(result.kept, vec!["src/Foo.java"]);
    /// assert!(matches!(result.skipped[0].reason, SkipReason::NotSource));
    /// assert!(matches!(result.skipped[1].reason, SkipReason::PatternMatch(_)));
    /// ```
    pub fn filter(&self, paths: Vec<String>) -> FilterResult {
        let mut kept = Vec::new();
        let mut skipped = Vec::new();

        for path in paths {
            if !self.is_source(&path) {
                skipped.push(SkippedFile {
                    path,
                    reason: SkipReason::NotSource,
                });
            } else if let Some(pat) = self.matching_pattern(&path) {
                let reason = SkipReason::PatternMatch(pat.to_string());
                skipped.push(SkippedFile { path, reason });
            } else {
                kept.push(path);
            }
        }

        FilterResult { kept, skipped }
    }

    fn matching_pattern(&self, path: &str) -> Option<&glob::Pattern> {
        self.exclude_patterns.iter().find(|p| p.matches(path))
    }
}

/// Result of filtering paths.
#[derive(Debug, Clone, Default)]
pub struct FilterResult {
    /// Paths that passed the filter, in input order.
    pub kept: Vec<String>,
    /// Paths that were skipped with reasons.
    pub skipped: Vec<SkippedFile>,
}

/// A path that was skipped during filtering.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: String,
    pub reason: SkipReason,
}

/// Reason a path was skipped.
///
/// # Examples
///
/// ```
/// use satd_difflens::filter::SkipReason;
///
/// let reason = SkipReason::NotSource;
/// assert_eq!(format!("{reason}"), "not a source file");
/// ```
#[derive(Debug, Clone)]
pub enum SkipReason {
    /// Extension not understood by the extractor.
    NotSource,
    /// Matched an exclude pattern.
    PatternMatch(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NotSource => write!(f, "not a source file"),
            SkipReason::PatternMatch(pat) => write!(f, "pattern: {pat}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directories_excluded_by_default() {
        let filter = SourceFilter::default_filter();
        for path in [
            "src/test/java/com/acme/FooTest.java",
            "module/tests/Helper.java",
            "test/Root.java",
        ] {
            assert!(filter.is_excluded(path), "expected {path} to be excluded");
            assert!(filter.is_source(path));
        }
    }

    #[test]
    fn similarly_named_directories_are_kept() {
        let filter = SourceFilter::default_filter();
        assert!(filter.is_candidate("src/main/java/testing/Util.java"));
        assert!(filter.is_candidate("src/main/java/contest/Entry.java"));
    }

    #[test]
    fn extension_match_is_exact() {
        let filter = SourceFilter::default_filter();
        assert!(filter.is_source("A.java"));
        assert!(!filter.is_source("A.javax"));
        assert!(!filter.is_source("A.kt"));
        assert!(!filter.is_source("java"));
    }

    #[test]
    fn extensions_accept_leading_dot() {
        let config = MiningConfig {
            extensions: vec![".kt".into()],
            ..MiningConfig::default()
        };
        let filter = SourceFilter::from_config(&config).unwrap();
        assert!(filter.is_source("Main.kt"));
    }

    #[test]
    fn invalid_pattern_is_a_config_error() {
        let config = MiningConfig {
            exclude_patterns: vec!["[".into()],
            ..MiningConfig::default()
        };
        assert!(matches!(
            SourceFilter::from_config(&config),
            Err(SatdError::Config(_))
        ));
    }

    #[test]
    fn filter_reports_why_paths_were_skipped() {
        let result = SourceFilter::default_filter().filter(vec![
            "src/main/java/A.java".into(),
            "docs/notes.txt".into(),
            "src/test/java/ATest.java".into(),
        ]);
        assert_eq!(result.kept, vec!["src/main/java/A.java"]);
        let reasons: Vec<String> = result.skipped.iter().map(|s| s.reason.to_string()).collect();
        assert_eq!(reasons[0], "not a source file");
        assert!(reasons[1].starts_with("pattern: "), "{}", reasons[1]);
    }

    #[test]
    fn empty_input_returns_empty_result() {
        let result = SourceFilter::default_filter().filter(Vec::new());
        assert!(result.kept.is_empty());
        assert!(result.skipped.is_empty());
    }
}
