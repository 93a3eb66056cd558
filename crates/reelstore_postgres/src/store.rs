//! Postgres-backed movie store.
//!
//! A newtype wrapping PgPool. Mutations enforce optimistic concurrency via
//! the version column; every operation is bounded by the caller's deadline.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};
use tracing::warn;

use reelstore_core::error::StoreError;
use reelstore_core::filters::{Metadata, MovieFilter};
use reelstore_core::movie::{Movie, MovieDraft};
use reelstore_core::ports::{MovieStore, Result};
use reelstore_core::validator::Validator;

/// Stateless store handle; cheap to clone, shares the pool.
#[derive(Clone)]
pub struct PgMovieStore {
    pool: PgPool,
}

impl PgMovieStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// ── Row structs (replacing anonymous tuples for FromRow) ──────

#[derive(Debug, FromRow)]
struct PgMovieRow {
    id: i64,
    created_at: DateTime<Utc>,
    title: String,
    year: i32,
    runtime: i32,
    genres: Vec<String>,
    version: i32,
}

impl From<PgMovieRow> for Movie {
    fn from(row: PgMovieRow) -> Self {
        Movie {
            id: row.id,
            created_at: row.created_at,
            title: row.title,
            year: row.year,
            runtime: row.runtime,
            genres: row.genres,
            version: row.version,
        }
    }
}

/// The store-assigned columns returned by `INSERT ... RETURNING`.
#[derive(Debug, FromRow)]
struct PgAssignedRow {
    id: i64,
    created_at: DateTime<Utc>,
    version: i32,
}

// ── Deadline and error mapping ────────────────────────────────

/// Bound a query future by the caller's deadline. On elapse the future is
/// dropped, which cancels the in-flight query and frees the connection.
async fn bounded<T, F>(deadline: Duration, fut: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result.map_err(map_sqlx_err),
        Err(_) => {
            warn!(?deadline, "store operation exceeded its deadline");
            Err(StoreError::Timeout)
        }
    }
}

fn map_sqlx_err(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db)
            if db.is_unique_violation()
                || db.is_foreign_key_violation()
                || db.is_check_violation() =>
        {
            StoreError::Integrity(db.message().to_string())
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Connection("connection pool exhausted".to_string())
        }
        sqlx::Error::Io(e) => StoreError::Connection(e.to_string()),
        sqlx::Error::Tls(e) => StoreError::Connection(e.to_string()),
        sqlx::Error::PoolClosed => StoreError::Connection("connection pool closed".to_string()),
        other => StoreError::Internal(anyhow::anyhow!(other)),
    }
}

// ── MovieStore implementation ─────────────────────────────────

#[async_trait::async_trait]
impl MovieStore for PgMovieStore {
    async fn insert(&self, draft: &MovieDraft, deadline: Duration) -> Result<Movie> {
        let query = sqlx::query_as::<_, PgAssignedRow>(
            r#"
            INSERT INTO movies (title, year, runtime, genres)
            VALUES ($1, $2, $3, $4)
            RETURNING id, created_at, version
            "#,
        )
        .bind(&draft.title)
        .bind(draft.year)
        .bind(draft.runtime)
        .bind(&draft.genres)
        .fetch_one(&self.pool);

        let assigned = bounded(deadline, query).await?;
        Ok(Movie {
            id: assigned.id,
            created_at: assigned.created_at,
            title: draft.title.clone(),
            year: draft.year,
            runtime: draft.runtime,
            genres: draft.genres.clone(),
            version: assigned.version,
        })
    }

    async fn get(&self, id: i64, deadline: Duration) -> Result<Movie> {
        // Ids are assigned from 1 upwards; anything below cannot exist.
        if id < 1 {
            return Err(StoreError::NotFound);
        }

        let query = sqlx::query_as::<_, PgMovieRow>(
            r#"
            SELECT id, created_at, title, year, runtime, genres, version
            FROM movies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool);

        match bounded(deadline, query).await? {
            Some(row) => Ok(row.into()),
            None => Err(StoreError::NotFound),
        }
    }

    async fn update(&self, movie: &Movie, deadline: Duration) -> Result<Movie> {
        // The version predicate is the whole concurrency story: a writer
        // who read version N only matches a row still at version N. Zero
        // matched rows means another writer committed first (or the record
        // is gone) — either way, an edit conflict.
        let query = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE movies
            SET title = $1, year = $2, runtime = $3, genres = $4, version = version + 1
            WHERE id = $5 AND version = $6
            RETURNING version
            "#,
        )
        .bind(&movie.title)
        .bind(movie.year)
        .bind(movie.runtime)
        .bind(&movie.genres)
        .bind(movie.id)
        .bind(movie.version)
        .fetch_optional(&self.pool);

        match bounded(deadline, query).await? {
            Some(version) => Ok(Movie {
                version,
                ..movie.clone()
            }),
            None => Err(StoreError::EditConflict),
        }
    }

    async fn delete(&self, id: i64, deadline: Duration) -> Result<()> {
        if id < 1 {
            return Err(StoreError::NotFound);
        }

        let query = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&self.pool);

        let result = bounded(deadline, query).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list(&self, filter: &MovieFilter, deadline: Duration) -> Result<(Vec<Movie>, Metadata)> {
        // Guarded precondition: an out-of-range page window never reaches
        // the query builder.
        let mut v = Validator::new();
        filter.validate(&mut v);
        v.into_result()?;

        // Sort fragments come from the closed enum, never caller strings.
        // Tie-break on id so paging stays stable under equal sort values.
        let sql = format!(
            r#"
            SELECT count(*) OVER() AS total_records,
                   id, created_at, title, year, runtime, genres, version
            FROM movies
            WHERE (LOWER(title) = LOWER($1) OR $1 = '')
              AND (genres @> $2 OR $2 = '{{}}')
            ORDER BY {} {}, id ASC
            LIMIT $3 OFFSET $4
            "#,
            filter.filters.sort.key.column(),
            filter.filters.sort.direction.as_sql(),
        );

        let query = sqlx::query(&sql)
            .bind(&filter.title)
            .bind(&filter.genres)
            .bind(filter.filters.limit())
            .bind(filter.filters.offset())
            .fetch_all(&self.pool);

        let rows: Vec<PgRow> = bounded(deadline, query).await?;

        let total_records = match rows.first() {
            Some(row) => row.try_get::<i64, _>("total_records").map_err(map_sqlx_err)?,
            None => 0,
        };

        let movies = rows
            .iter()
            .map(|row| PgMovieRow::from_row(row).map(Movie::from).map_err(map_sqlx_err))
            .collect::<Result<Vec<_>>>()?;

        let metadata =
            Metadata::calculate(total_records, filter.filters.page, filter.filters.page_size);
        Ok((movies, metadata))
    }
}
