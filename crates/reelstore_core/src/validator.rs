//! Error-accumulating field validator.
//!
//! Checks never fail fast: every violated constraint is recorded so the
//! caller can report all field errors in one round trip. Per field, the
//! first recorded message wins and later ones are dropped.

use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;

use regex::Regex;

use crate::error::StoreError;

#[derive(Debug, Default)]
pub struct Validator {
    errors: BTreeMap<String, String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff no errors have been recorded.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record `message` under `field` unless an error already exists there.
    pub fn add_error(&mut self, field: &str, message: &str) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    /// Record an error only if the check is not ok.
    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add_error(field, message);
        }
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// Consume the validator, turning accumulated errors into a
    /// [`StoreError::Validation`]. A record failing this must never reach
    /// the store's write path.
    pub fn into_result(self) -> Result<(), StoreError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(StoreError::Validation(self.errors))
        }
    }
}

/// True if `value` is one of the permitted values.
pub fn permitted_value<T: PartialEq>(value: &T, permitted: &[T]) -> bool {
    permitted.contains(value)
}

/// True if a string value matches the given pattern.
pub fn matches(value: &str, rx: &Regex) -> bool {
    rx.is_match(value)
}

/// True if all values in the slice are distinct.
pub fn unique<T: Eq + Hash>(values: &[T]) -> bool {
    let mut seen = HashSet::with_capacity(values.len());
    values.iter().all(|value| seen.insert(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── check / add_error ─────────────────────────────────────────

    #[test]
    fn fresh_validator_is_valid() {
        assert!(Validator::new().is_valid());
    }

    #[test]
    fn failed_check_records_error() {
        let mut v = Validator::new();
        v.check(false, "title", "must be provided");
        assert!(!v.is_valid());
        assert_eq!(v.errors().get("title").map(String::as_str), Some("must be provided"));
    }

    #[test]
    fn passing_check_records_nothing() {
        let mut v = Validator::new();
        v.check(true, "title", "must be provided");
        assert!(v.is_valid());
    }

    #[test]
    fn first_error_per_field_wins() {
        let mut v = Validator::new();
        v.add_error("year", "first");
        v.add_error("year", "second");
        assert_eq!(v.errors().get("year").map(String::as_str), Some("first"));
    }

    #[test]
    fn errors_accumulate_across_fields() {
        let mut v = Validator::new();
        v.check(false, "title", "must be provided");
        v.check(false, "year", "must be provided");
        assert_eq!(v.errors().len(), 2);
    }

    #[test]
    fn into_result_carries_all_field_errors() {
        let mut v = Validator::new();
        v.check(false, "runtime", "must be a positive integer");
        let err = v.into_result().unwrap_err();
        match err {
            StoreError::Validation(errors) => {
                assert_eq!(errors.get("runtime").map(String::as_str), Some("must be a positive integer"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    // ── generic helpers ───────────────────────────────────────────

    #[test]
    fn permitted_value_membership() {
        assert!(permitted_value(&"drama", &["drama", "comedy"]));
        assert!(!permitted_value(&"war", &["drama", "comedy"]));
    }

    #[test]
    fn matches_pattern() {
        let rx = Regex::new(r"^\d{4}$").unwrap();
        assert!(matches("2009", &rx));
        assert!(!matches("20x9", &rx));
    }

    #[test]
    fn unique_detects_duplicates() {
        assert!(unique(&["animation", "adventure"]));
        assert!(!unique(&["drama", "drama"]));
        assert!(unique::<String>(&[]));
    }
}
