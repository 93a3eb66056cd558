//! Caller-supplied search criteria for the list operation: title and genre
//! matching, an allow-listed sort key, and a bounded page window.

// Sort enums use `from_str() -> Option<Self>` instead of `FromStr` because
// they return None for unknown values rather than an error.
#![allow(clippy::should_implement_trait)]

use serde::{Deserialize, Serialize};

use crate::validator::Validator;

/// Hard ceilings for the page window.
pub const MAX_PAGE: i64 = 10_000_000;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Columns a caller may sort by. Closed enumeration: the SQL fragment is
/// always one of the fixed values below, never built from caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Id,
    Title,
    Year,
    Runtime,
}

impl SortKey {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Year => "year",
            Self::Runtime => "runtime",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "id" => Some(Self::Id),
            "title" => Some(Self::Title),
            "year" => Some(Self::Year),
            "runtime" => Some(Self::Runtime),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A sort key plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Parse a caller-facing sort value such as `"year"` or `"-year"`
    /// (leading `-` means descending). Returns None for any key outside
    /// the allow-list.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.strip_prefix('-') {
            Some(key) => SortKey::from_str(key).map(|key| Self::new(key, SortDirection::Desc)),
            None => SortKey::from_str(s).map(|key| Self::new(key, SortDirection::Asc)),
        }
    }
}

impl Default for Sort {
    fn default() -> Self {
        Self::new(SortKey::Id, SortDirection::Asc)
    }
}

/// Page window plus sort order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Filters {
    pub page: i64,
    pub page_size: i64,
    pub sort: Sort,
}

impl Filters {
    /// Validates independently of the record schema: out-of-range page
    /// windows are rejected before any query is built.
    pub fn validate(&self, v: &mut Validator) {
        v.check(self.page > 0, "page", "must be greater than zero");
        v.check(self.page <= MAX_PAGE, "page", "must be a maximum of 10 million");
        v.check(self.page_size > 0, "page_size", "must be greater than zero");
        v.check(
            self.page_size <= MAX_PAGE_SIZE,
            "page_size",
            "must be a maximum of 100",
        );
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            sort: Sort::default(),
        }
    }
}

/// Search criteria for the movie list operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieFilter {
    /// Case-insensitive exact title match; empty matches every title.
    pub title: String,
    /// A record matches when its genre set contains all of these; empty
    /// matches every record.
    pub genres: Vec<String>,
    pub filters: Filters,
}

impl MovieFilter {
    pub fn validate(&self, v: &mut Validator) {
        self.filters.validate(v);
    }
}

/// Pagination metadata returned alongside list results, computed from the
/// total row count under the same filter predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub current_page: i64,
    pub page_size: i64,
    pub first_page: i64,
    pub last_page: i64,
    pub total_records: i64,
}

impl Metadata {
    pub fn calculate(total_records: i64, page: i64, page_size: i64) -> Self {
        if total_records == 0 {
            // No matching rows: everything zero, not page 1 of nothing.
            return Self::default();
        }
        Self {
            current_page: page,
            page_size,
            first_page: 1,
            last_page: (total_records + page_size - 1) / page_size,
            total_records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── sort allow-list ───────────────────────────────────────────

    #[test]
    fn sort_parses_ascending_and_descending() {
        assert_eq!(
            Sort::from_str("year"),
            Some(Sort::new(SortKey::Year, SortDirection::Asc))
        );
        assert_eq!(
            Sort::from_str("-title"),
            Some(Sort::new(SortKey::Title, SortDirection::Desc))
        );
    }

    #[test]
    fn sort_rejects_keys_outside_the_allow_list() {
        assert_eq!(Sort::from_str("created_at"), None);
        assert_eq!(Sort::from_str("-version"), None);
        assert_eq!(Sort::from_str("title; DROP TABLE movies"), None);
        assert_eq!(Sort::from_str(""), None);
    }

    #[test]
    fn sort_maps_to_fixed_sql_fragments() {
        assert_eq!(SortKey::Runtime.column(), "runtime");
        assert_eq!(SortDirection::Desc.as_sql(), "DESC");
    }

    // ── filter validation ─────────────────────────────────────────

    fn errors_for(filters: &Filters) -> std::collections::BTreeMap<String, String> {
        let mut v = Validator::new();
        filters.validate(&mut v);
        v.errors().clone()
    }

    #[test]
    fn default_filters_are_valid() {
        assert!(errors_for(&Filters::default()).is_empty());
    }

    #[test]
    fn nonpositive_page_is_rejected() {
        let filters = Filters { page: 0, ..Filters::default() };
        assert!(errors_for(&filters).contains_key("page"));
    }

    #[test]
    fn oversized_page_size_is_rejected() {
        let filters = Filters { page_size: MAX_PAGE_SIZE + 1, ..Filters::default() };
        assert!(errors_for(&filters).contains_key("page_size"));
    }

    #[test]
    fn offset_is_derived_from_the_page_window() {
        let filters = Filters { page: 3, page_size: 20, ..Filters::default() };
        assert_eq!(filters.limit(), 20);
        assert_eq!(filters.offset(), 40);
    }

    // ── metadata ──────────────────────────────────────────────────

    #[test]
    fn metadata_for_no_rows_is_all_zero() {
        assert_eq!(Metadata::calculate(0, 1, 20), Metadata::default());
    }

    #[test]
    fn metadata_last_page_rounds_up() {
        let meta = Metadata::calculate(101, 2, 20);
        assert_eq!(meta.current_page, 2);
        assert_eq!(meta.first_page, 1);
        assert_eq!(meta.last_page, 6);
        assert_eq!(meta.total_records, 101);
    }

    #[test]
    fn metadata_exact_multiple_does_not_round_up() {
        assert_eq!(Metadata::calculate(100, 1, 20).last_page, 5);
    }
}
