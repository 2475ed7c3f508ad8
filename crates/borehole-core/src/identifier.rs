//! Borehole identifiers with numeric ordering.
//!
//! This module provides the [`BoreholeId`] type. Identifiers are usually the
//! digit strings found on drawing labels ("12" from "скв. 12"), so ordering
//! compares them by numeric magnitude rather than lexically.

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when constructing a [`BoreholeId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("borehole identifier must not be empty")]
    Empty,
}

/// Normalized borehole identifier.
///
/// Digit-only identifiers order by numeric value, so `"2"` sorts before
/// `"10"`. Leading zeros do not affect magnitude; `"007"` and `"7"` compare by
/// value first and then by spelling, which keeps the ordering total and
/// consistent with equality. Identifiers that are not purely numeric sort
/// after all numeric ones, lexically among themselves.
///
/// # Examples
///
/// ```
/// use borehole_core::identifier::BoreholeId;
///
/// let mut ids: Vec<BoreholeId> = ["10", "2", "1"]
///     .into_iter()
///     .map(|s| s.parse().unwrap())
///     .collect();
/// ids.sort();
///
/// assert_eq!(ids, ["1", "2", "10"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BoreholeId(String);

impl BoreholeId {
    /// Creates an identifier from its textual form.
    ///
    /// Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::Empty`] if nothing remains after trimming.
    pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdentifierError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Synthesizes the fallback identifier for the entity at a 1-based position.
    ///
    /// # Examples
    ///
    /// ```
    /// use borehole_core::identifier::BoreholeId;
    ///
    /// assert_eq!(BoreholeId::sequential(3), "3");
    /// ```
    pub fn sequential(position: usize) -> Self {
        Self(position.to_string())
    }

    /// Returns the identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the identifier consists only of ASCII digits
    pub fn is_numeric(&self) -> bool {
        self.0.bytes().all(|b| b.is_ascii_digit())
    }

    /// Digits with leading zeros stripped, for numeric identifiers only.
    fn magnitude(&self) -> Option<&str> {
        self.is_numeric().then(|| self.0.trim_start_matches('0'))
    }
}

impl Ord for BoreholeId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.magnitude(), other.magnitude()) {
            (Some(a), Some(b)) => a
                .len()
                .cmp(&b.len())
                .then_with(|| a.cmp(b))
                .then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for BoreholeId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for BoreholeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BoreholeId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for BoreholeId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BoreholeId> for String {
    fn from(id: BoreholeId) -> Self {
        id.0
    }
}

impl AsRef<str> for BoreholeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for BoreholeId {
    /// Allows direct comparison with string slices: `id == "12"`
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for BoreholeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn id(s: &str) -> BoreholeId {
        BoreholeId::new(s).unwrap()
    }

    #[test]
    fn test_new_trims_whitespace() {
        assert_eq!(id("  12 "), "12");
    }

    #[test]
    fn test_new_rejects_empty() {
        assert_eq!(BoreholeId::new(""), Err(IdentifierError::Empty));
        assert_eq!(BoreholeId::new("   "), Err(IdentifierError::Empty));
        assert!("".parse::<BoreholeId>().is_err());
    }

    #[test]
    fn test_sequential() {
        assert_eq!(BoreholeId::sequential(1), "1");
        assert_eq!(BoreholeId::sequential(42), "42");
    }

    #[test]
    fn test_numeric_ordering() {
        assert!(id("2") < id("10"));
        assert!(id("9") < id("11"));
        assert!(id("100") > id("99"));
    }

    #[test]
    fn test_leading_zeros_order_by_value() {
        assert!(id("007") < id("10"));
        assert!(id("08") > id("7"));
        // Same magnitude falls back to spelling so Ord stays consistent with Eq
        assert_ne!(id("007").cmp(&id("7")), Ordering::Equal);
    }

    #[test]
    fn test_non_numeric_sorts_last() {
        let mut ids = vec![id("B-2"), id("10"), id("A"), id("3")];
        ids.sort();
        assert_eq!(ids, ["3", "10", "A", "B-2"]);
    }

    #[test]
    fn test_is_numeric() {
        assert!(id("123").is_numeric());
        assert!(!id("12a").is_numeric());
    }

    #[test]
    fn test_serde_as_plain_string() {
        #[derive(Debug, Serialize, Deserialize)]
        struct Holder {
            id: BoreholeId,
        }

        let holder: Holder = toml::from_str(r#"id = "15""#).unwrap();
        assert_eq!(holder.id, "15");
        assert!(toml::from_str::<Holder>(r#"id = "  ""#).is_err());

        let text = toml::to_string(&holder).unwrap();
        assert!(text.contains(r#"id = "15""#));
    }

    proptest! {
        #[test]
        fn numeric_order_matches_integer_order(a in 0u64..1_000_000, b in 0u64..1_000_000) {
            let left = BoreholeId::sequential(a as usize);
            let right = BoreholeId::sequential(b as usize);
            prop_assert_eq!(left.cmp(&right), a.cmp(&b));
        }
    }
}
