//! Keyword-based SATD classification.

use regex::{Regex, RegexBuilder};
use satd_core::{ClassifierConfig, DebtCategory, SatdClassifier, SatdError};

/// Labels a comment as SATD when it contains one of the configured keywords
/// as a whole word.
///
/// Rules are tried in configuration order and the first hit decides the
/// category.
///
/// # Examples
///
/// ```
/// use satd_commentlens::classify::KeywordClassifier;
/// use satd_core::{ClassifierConfig, DebtCategory, SatdClassifier};
///
/// let classifier = KeywordClassifier::from_config(&ClassifierConfig::default()).unwrap();
/// assert_eq!(
///     classifier.classify("// FIXME: leaks on error").unwrap(),
///     Some(DebtCategory::Defect)
/// );
/// assert_eq!(classifier.classify("// debug helper").unwrap(), None);
/// ```
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    rules: Vec<(Regex, DebtCategory)>,
}

impl KeywordClassifier {
    /// Compile one `\bkeyword\b` pattern per configured rule.
    ///
    /// # Errors
    ///
    /// Returns [`SatdError::Config`] if a rule cannot be compiled.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, SatdError> {
        let mut rules = Vec::with_capacity(config.keywords.len());
        for rule in &config.keywords {
            let keyword = rule.keyword.trim();
            if keyword.is_empty() {
                continue;
            }
            let pattern = format!(r"\b{}\b", regex::escape(keyword));
            let regex = RegexBuilder::new(&pattern)
                .case_insensitive(!config.case_sensitive)
                .build()
                .map_err(|e| SatdError::Config(format!("invalid keyword '{keyword}': {e}")))?;
            rules.push((regex, rule.category));
        }
        Ok(Self { rules })
    }

    fn category_of(&self, text: &str) -> Option<DebtCategory> {
        self.rules
            .iter()
            .find(|(regex, _)| regex.is_match(text))
            .map(|(_, category)| *category)
    }
}

impl SatdClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> satd_core::Result<Option<DebtCategory>> {
        Ok(self.category_of(text))
    }
}

#[cfg(test)]
mod tests {
    use satd_core::KeywordRule;

    use super::*;

    fn default_classifier() -> KeywordClassifier {
        KeywordClassifier::from_config(&ClassifierConfig::default()).unwrap()
    }

    #[test]
    fn markers_map_to_categories() {
        let c = default_classifier();
        let cases = [
            ("// TODO: optimize", Some(DebtCategory::Implementation)),
            ("/* HACK around driver bug */", Some(DebtCategory::Defect)),
            ("// this is a workaround", Some(DebtCategory::Design)),
            ("// needs test coverage", Some(DebtCategory::Test)),
            ("/** document this */", Some(DebtCategory::Documentation)),
            ("// returns the sum", None),
        ];
        for (text, expected) in cases {
            assert_eq!(c.classify(text).unwrap(), expected, "{text}");
        }
    }

    #[test]
    fn keywords_must_be_whole_words() {
        let c = default_classifier();
        assert_eq!(c.classify("// debugging output").unwrap(), None);
        assert_eq!(c.classify("// see todos.txt").unwrap(), None);
        assert_eq!(c.classify("// TODO_LATER").unwrap(), None);
        assert!(c.classify("//TODO").unwrap().is_some());
    }

    #[test]
    fn word_boundaries_follow_unicode_letters() {
        let c = default_classifier();
        assert_eq!(c.classify("// TODOé later").unwrap(), None);
        assert_eq!(c.classify("// éTODO later").unwrap(), None);
        assert_eq!(
            c.classify("// TODO: café cache").unwrap(),
            Some(DebtCategory::Implementation)
        );
    }

    #[test]
    fn keywords_are_matched_literally() {
        let config = ClassifierConfig {
            keywords: vec![KeywordRule {
                keyword: "work.around".into(),
                category: DebtCategory::Design,
            }],
            case_sensitive: false,
        };
        let c = KeywordClassifier::from_config(&config).unwrap();
        assert_eq!(
            c.classify("// work.around for JDK-8").unwrap(),
            Some(DebtCategory::Design)
        );
        assert_eq!(c.classify("// workxaround").unwrap(), None);
    }

    #[test]
    fn matching_ignores_case_by_default() {
        let c = default_classifier();
        assert_eq!(
            c.classify("// fixme later").unwrap(),
            Some(DebtCategory::Defect)
        );
    }

    #[test]
    fn case_sensitive_rules() {
        let config = ClassifierConfig {
            keywords: vec![KeywordRule {
                keyword: "TODO".into(),
                category: DebtCategory::Implementation,
            }],
            case_sensitive: true,
        };
        let c = KeywordClassifier::from_config(&config).unwrap();
        assert!(c.classify("// TODO").unwrap().is_some());
        assert!(c.classify("// todo").unwrap().is_none());
    }

    #[test]
    fn classification_is_deterministic() {
        let c = default_classifier();
        let text = "// XXX temporary hack";
        assert_eq!(c.classify(text).unwrap(), c.classify(text).unwrap());
        assert_eq!(c.classify(text).unwrap(), Some(DebtCategory::Defect));
    }
}
