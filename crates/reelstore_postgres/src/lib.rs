//! PostgreSQL implementation of the reelstore_core store port.
//!
//! All SQL is runtime-checked (sqlx::query, not sqlx::query!) to avoid a
//! compile-time DB requirement. Placeholder-bound parameters throughout;
//! the only interpolated fragment is the ORDER BY clause, which comes from
//! the closed sort-key enum in reelstore_core.

pub mod pool;
pub mod store;

pub use pool::{connect, DatabaseConfig};
pub use store::PgMovieStore;
