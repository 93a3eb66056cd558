//! Storage port trait for the movie catalog.
//! Implemented by reelstore_postgres — callers depend only on this trait.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::filters::{Metadata, MovieFilter};
use crate::movie::{Movie, MovieDraft};

pub type Result<T> = std::result::Result<T, StoreError>;

/// CRUD + filtered-list operations over the movies table.
///
/// The store is a stateless façade over a shared connection pool: no
/// operation spawns background work or retains state between calls.
/// Every operation is scoped to the caller-supplied `deadline`; once it
/// elapses the operation aborts with [`StoreError::Timeout`] instead of
/// leaking a blocked worker.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Write a new record. The store — not the caller — assigns id,
    /// created_at and version (starting at 1) and returns the full record.
    async fn insert(&self, draft: &MovieDraft, deadline: Duration) -> Result<Movie>;

    /// Fetch a record by id. Ids below 1 fail with `NotFound` without
    /// issuing a query.
    async fn get(&self, id: i64, deadline: Duration) -> Result<Movie>;

    /// Conditional update keyed on (id, version): succeeds only if no
    /// other writer has committed since `movie.version` was read, and
    /// increments the version atomically with the write. Zero matched
    /// rows — whether the record was deleted or the version is stale —
    /// surfaces as `EditConflict`, never silently as a lost update.
    async fn update(&self, movie: &Movie, deadline: Duration) -> Result<Movie>;

    /// Hard delete; no tombstone. Ids below 1 or zero affected rows fail
    /// with `NotFound`.
    async fn delete(&self, id: i64, deadline: Duration) -> Result<()>;

    /// Filtered, paginated listing in the filter's sort order, plus a
    /// total count computed under the same predicate. An empty result is
    /// Ok, never an error.
    async fn list(&self, filter: &MovieFilter, deadline: Duration)
        -> Result<(Vec<Movie>, Metadata)>;
}
