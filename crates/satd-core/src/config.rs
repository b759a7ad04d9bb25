use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SatdError;
use crate::types::DebtCategory;

/// Top-level configuration loaded from `.satdtrack.toml`.
///
/// Resolution order: `--config` flag > `./.satdtrack.toml` > defaults.
///
/// # Examples
///
/// ```
/// use satd_core::SatdConfig;
///
/// let config = SatdConfig::default();
/// assert_eq!(config.mining.extensions, vec!["java"]);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SatdConfig {
    /// Which files are mined and how far history is walked.
    #[serde(default)]
    pub mining: MiningConfig,
    /// Keyword classifier settings.
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl SatdConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SatdError::Io`] if the file cannot be read,
    /// [`SatdError::Toml`] if the content is not valid TOML, or
    /// [`SatdError::Config`] if a value is invalid.
    pub fn from_file(path: &Path) -> Result<Self, SatdError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`SatdError::Toml`] if parsing fails, or
    /// [`SatdError::Config`] if a value is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use satd_core::SatdConfig;
    ///
    /// let toml = r#"
    /// [mining]
    /// max_commits = 50
    /// "#;
    /// let config = SatdConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.mining.max_commits, 50);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, SatdError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), SatdError> {
        if self.mining.extensions.is_empty() {
            return Err(SatdError::Config(
                "mining.extensions must name at least one extension".into(),
            ));
        }
        if let Some(rule) = self.classifier.keywords.iter().find(|r| r.keyword.trim().is_empty()) {
            return Err(SatdError::Config(format!(
                "classifier keyword for {} is empty",
                rule.category
            )));
        }
        Ok(())
    }
}

/// File selection and history traversal settings.
///
/// # Examples
///
/// ```
/// use satd_core::MiningConfig;
///
/// let config = MiningConfig::default();
/// assert_eq!(config.max_commits, 0);
/// assert!(config.exclude_patterns.iter().any(|p| p.contains("test")));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiningConfig {
    /// Source file extensions the extractor understands (default: `["java"]`).
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Glob patterns excluded from the modified-files views (default: test directories).
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
    /// Stop a history walk after this many commits; 0 means unlimited.
    #[serde(default)]
    pub max_commits: usize,
    /// Only follow the first parent of merge commits.
    #[serde(default)]
    pub first_parent_only: bool,
}

fn default_extensions() -> Vec<String> {
    vec!["java".into()]
}

fn default_exclude_patterns() -> Vec<String> {
    vec!["**/test/**".into(), "**/tests/**".into()]
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude_patterns: default_exclude_patterns(),
            max_commits: 0,
            first_parent_only: false,
        }
    }
}

/// A keyword that marks a comment as SATD of a given category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    pub category: DebtCategory,
}

impl KeywordRule {
    fn new(keyword: &str, category: DebtCategory) -> Self {
        Self {
            keyword: keyword.into(),
            category,
        }
    }
}

/// Keyword classifier configuration.
///
/// Rules are checked in order; the first keyword found decides the category.
///
/// # Examples
///
/// ```
/// use satd_core::ClassifierConfig;
///
/// let config = ClassifierConfig::default();
/// assert!(!config.case_sensitive);
/// assert!(config.keywords.iter().any(|r| r.keyword == "FIXME"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Keyword rules (default: the common SATD markers).
    #[serde(default = "default_keywords")]
    pub keywords: Vec<KeywordRule>,
    /// Match keywords case-sensitively (default: false).
    #[serde(default)]
    pub case_sensitive: bool,
}

fn default_keywords() -> Vec<KeywordRule> {
    vec![
        KeywordRule::new("FIXME", DebtCategory::Defect),
        KeywordRule::new("BUG", DebtCategory::Defect),
        KeywordRule::new("XXX", DebtCategory::Defect),
        KeywordRule::new("HACK", DebtCategory::Design),
        KeywordRule::new("workaround", DebtCategory::Design),
        KeywordRule::new("kludge", DebtCategory::Design),
        KeywordRule::new("ugly", DebtCategory::Design),
        KeywordRule::new("temporary", DebtCategory::Design),
        KeywordRule::new("needs test", DebtCategory::Test),
        KeywordRule::new("untested", DebtCategory::Test),
        KeywordRule::new("document this", DebtCategory::Documentation),
        KeywordRule::new("TODO", DebtCategory::Implementation),
        KeywordRule::new("not implemented", DebtCategory::Implementation),
    ]
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            case_sensitive: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = SatdConfig::default();
        assert_eq!(config.mining.extensions, vec!["java"]);
        assert_eq!(
            config.mining.exclude_patterns,
            vec!["**/test/**", "**/tests/**"]
        );
        assert_eq!(config.mining.max_commits, 0);
        assert!(!config.mining.first_parent_only);
        assert!(!config.classifier.case_sensitive);
        assert!(!config.classifier.keywords.is_empty());
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[mining]
extensions = ["java", "kt"]
exclude_patterns = ["generated/**"]
max_commits = 200
first_parent_only = true

[classifier]
case_sensitive = true

[[classifier.keywords]]
keyword = "PERF"
category = "DESIGN"
"#;
        let config = SatdConfig::from_toml(toml).unwrap();
        assert_eq!(config.mining.extensions, vec!["java", "kt"]);
        assert_eq!(config.mining.exclude_patterns, vec!["generated/**"]);
        assert_eq!(config.mining.max_commits, 200);
        assert!(config.mining.first_parent_only);
        assert!(config.classifier.case_sensitive);
        assert_eq!(
            config.classifier.keywords,
            vec![KeywordRule::new("PERF", DebtCategory::Design)]
        );
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = SatdConfig::from_toml("").unwrap();
        assert_eq!(config.mining.extensions, vec!["java"]);
        assert!(config.classifier.keywords.iter().any(|r| r.keyword == "TODO"));
    }

    #[test]
    fn invalid_toml_returns_error() {
        assert!(SatdConfig::from_toml("{{invalid}}").is_err());
    }

    #[test]
    fn empty_extension_list_is_rejected() {
        let err = SatdConfig::from_toml("[mining]\nextensions = []\n").unwrap_err();
        assert!(matches!(err, SatdError::Config(_)));
    }

    #[test]
    fn blank_keyword_is_rejected() {
        let toml = r#"
[[classifier.keywords]]
keyword = "  "
category = "TEST"
"#;
        assert!(matches!(
            SatdConfig::from_toml(toml),
            Err(SatdError::Config(_))
        ));
    }
}
