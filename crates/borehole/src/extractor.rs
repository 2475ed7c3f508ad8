//! Borehole number extraction from free-form label text.
//!
//! Survey drawings label boreholes in several notations: `скв. 12`,
//! `скважина 7`, `№ 5`, `12 скв`, or a bare `42`. [`IdentifierExtractor`]
//! tries an ordered list of patterns against the lower-cased, trimmed text and
//! returns the first capture of the first pattern that matches. Order matters:
//! the more specific notations are tried before the bare-number rule.

use std::sync::LazyLock;

use log::trace;
use regex::Regex;

use borehole_core::identifier::BoreholeId;

use crate::error::BoreholeError;

/// Built-in label rules, highest priority first.
const DEFAULT_PATTERNS: [&str; 5] = [
    // скв. 123, скважина 123
    r"скв[а-я]*\.?\s*([0-9]+)",
    // № 123
    r"№\s*([0-9]+)",
    // 123 скв
    r"([0-9]+)\s*скв",
    // скв 123
    r"скв\s*([0-9]+)",
    // bare number
    r"^([0-9]+)$",
];

static DEFAULT_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DEFAULT_PATTERNS
        .iter()
        .map(|pattern| Regex::new(pattern).expect("valid built-in borehole pattern"))
        .collect()
});

/// Parses borehole identifiers out of label and attribute text.
///
/// # Examples
///
/// ```
/// use borehole::extractor::IdentifierExtractor;
///
/// let extractor = IdentifierExtractor::default();
///
/// assert_eq!(extractor.extract("Скв. 12").unwrap(), "12");
/// assert_eq!(extractor.extract("№ 5").unwrap(), "5");
/// assert!(extractor.extract("ось А").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct IdentifierExtractor {
    rules: Vec<Regex>,
}

impl Default for IdentifierExtractor {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES.clone(),
        }
    }
}

impl IdentifierExtractor {
    /// Creates an extractor from custom patterns, tried in the given order.
    ///
    /// An empty list selects the built-in rules.
    ///
    /// # Errors
    ///
    /// Returns [`BoreholeError::Config`] if a pattern does not compile or has
    /// no capture group to take the number from.
    pub fn with_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self, BoreholeError> {
        if patterns.is_empty() {
            return Ok(Self::default());
        }

        let rules = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                let regex = Regex::new(pattern).map_err(|err| {
                    BoreholeError::Config(format!("invalid label pattern `{pattern}`: {err}"))
                })?;
                if regex.captures_len() < 2 {
                    return Err(BoreholeError::Config(format!(
                        "label pattern `{pattern}` has no capture group"
                    )));
                }
                Ok(regex)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }

    /// Number of rules, in priority order
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Extracts an identifier from a label, or `None` if no rule matches.
    pub fn extract(&self, text: &str) -> Option<BoreholeId> {
        let folded = text.trim().to_lowercase();

        self.rules.iter().enumerate().find_map(|(rule, regex)| {
            let captured = regex.captures(&folded)?.get(1)?;
            let id = BoreholeId::new(captured.as_str()).ok()?;
            trace!(text = text, rule = rule, identifier = id.as_str(); "Label matched");
            Some(id)
        })
    }

    /// Extracts an identifier from the first attribute value that yields one.
    pub fn extract_from_attributes<'a>(
        &self,
        values: impl IntoIterator<Item = &'a str>,
    ) -> Option<BoreholeId> {
        values.into_iter().find_map(|value| self.extract(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn extract(text: &str) -> Option<String> {
        IdentifierExtractor::default()
            .extract(text)
            .map(String::from)
    }

    #[test]
    fn test_supported_label_formats() {
        let cases = [
            ("скв. 12", "12"),
            ("скважина 7", "7"),
            ("№ 5", "5"),
            ("12 скв", "12"),
            ("скв 9", "9"),
            ("42", "42"),
        ];

        for (text, expected) in cases {
            assert_eq!(extract(text).as_deref(), Some(expected), "label {text:?}");
        }
    }

    #[test]
    fn test_case_folding_and_trimming() {
        assert_eq!(extract("  СКВ.15  ").as_deref(), Some("15"));
        assert_eq!(extract("Скважина №3").as_deref(), Some("3"));
        assert_eq!(extract(" 8 ").as_deref(), Some("8"));
    }

    #[test]
    fn test_unrelated_text_yields_none() {
        for text in ["", "ось А", "отм. 125.4", "abc", "скв.", "№"] {
            assert_eq!(extract(text), None, "label {text:?}");
        }
    }

    #[test]
    fn test_number_inside_text_without_marker_is_ignored() {
        // Only the whole-string rule accepts bare numbers
        assert_eq!(extract("глубина 25 м"), None);
    }

    #[test]
    fn test_rule_priority() {
        // The "скв" prefix rule wins over the number-sign rule
        assert_eq!(extract("скв. 4 № 9").as_deref(), Some("4"));
        // Number sign before the trailing "скв" rule
        assert_eq!(extract("№ 6 11 скв").as_deref(), Some("6"));
    }

    #[test]
    fn test_leading_zeros_are_kept() {
        assert_eq!(extract("скв. 007").as_deref(), Some("007"));
    }

    #[test]
    fn test_extract_from_attributes_takes_first_match() {
        let extractor = IdentifierExtractor::default();
        let id = extractor.extract_from_attributes(["разведочная", "скв. 17", "25"]);
        assert_eq!(id.unwrap(), "17");

        assert!(extractor.extract_from_attributes(["a", "b"]).is_none());
        assert!(extractor.extract_from_attributes(Vec::<&str>::new()).is_none());
    }

    #[test]
    fn test_custom_patterns() {
        let extractor = IdentifierExtractor::with_patterns(&[r"bh-([0-9]+)"]).unwrap();
        assert_eq!(extractor.rule_count(), 1);
        assert_eq!(extractor.extract("BH-31").unwrap(), "31");
        assert!(extractor.extract("скв. 12").is_none());
    }

    #[test]
    fn test_empty_custom_patterns_use_defaults() {
        let extractor = IdentifierExtractor::with_patterns::<&str>(&[]).unwrap();
        assert_eq!(extractor.rule_count(), 5);
    }

    #[test]
    fn test_invalid_custom_patterns() {
        assert!(matches!(
            IdentifierExtractor::with_patterns(&["(unclosed"]),
            Err(BoreholeError::Config(_))
        ));
        assert!(matches!(
            IdentifierExtractor::with_patterns(&["bh-[0-9]+"]),
            Err(BoreholeError::Config(_))
        ));
    }

    proptest! {
        #[test]
        fn prefixed_numbers_are_extracted(n in 0u32..1_000_000, gap in " {0,3}") {
            let text = format!("скв.{gap}{n}");
            prop_assert_eq!(extract(&text), Some(n.to_string()));
        }

        #[test]
        fn bare_numbers_are_extracted(n in 0u32..1_000_000) {
            prop_assert_eq!(extract(&n.to_string()), Some(n.to_string()));
        }

        #[test]
        fn letters_only_never_match(text in "[a-z ]{0,20}") {
            prop_assert_eq!(extract(&text), None);
        }
    }
}
