use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::validator::{unique, Validator};

/// Release years before the first motion pictures are rejected.
pub const EARLIEST_YEAR: i32 = 1888;
/// Upper bound on title length, in bytes.
pub const MAX_TITLE_BYTES: usize = 500;
/// Bounds on the number of genres per record.
pub const MIN_GENRES: usize = 1;
pub const MAX_GENRES: usize = 5;

/// A persisted movie record.
///
/// `id`, `created_at` and `version` are store-owned: the store assigns them
/// on insert and only the store ever changes `version`. `version` starts at
/// 1 and is incremented on every successful update — it is the
/// optimistic-lock token presented back on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub year: i32,
    /// Length in minutes.
    pub runtime: i32,
    /// 1–5 genres, no duplicates. Order carries no meaning but is
    /// preserved for display.
    pub genres: Vec<String>,
    pub version: i32,
}

impl Movie {
    pub fn validate(&self, v: &mut Validator) {
        validate_payload(v, &self.title, self.year, self.runtime, &self.genres);
    }
}

/// Insert input: the payload fields only. Store-assigned fields are not
/// representable here, so a caller cannot smuggle in an id or version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDraft {
    pub title: String,
    pub year: i32,
    pub runtime: i32,
    pub genres: Vec<String>,
}

impl MovieDraft {
    pub fn validate(&self, v: &mut Validator) {
        validate_payload(v, &self.title, self.year, self.runtime, &self.genres);
    }
}

fn validate_payload(v: &mut Validator, title: &str, year: i32, runtime: i32, genres: &[String]) {
    v.check(!title.is_empty(), "title", "must be provided");
    v.check(
        title.len() <= MAX_TITLE_BYTES,
        "title",
        "must not be more than 500 bytes long",
    );

    v.check(year != 0, "year", "must be provided");
    v.check(year >= EARLIEST_YEAR, "year", "must be no earlier than 1888");
    v.check(year <= Utc::now().year(), "year", "must not be in the future");

    v.check(runtime != 0, "runtime", "must be provided");
    v.check(runtime > 0, "runtime", "must be a positive integer");

    v.check(!genres.is_empty(), "genres", "must contain at least 1 genre");
    v.check(
        genres.len() <= MAX_GENRES,
        "genres",
        "must not contain more than 5 genres",
    );
    v.check(unique(genres), "genres", "must not contain duplicate values");
}
