//! Core domain types for the reelstore movie catalog.
//! These are pure value types and port traits — no sqlx, no DB dependencies.
//! The Postgres adapter lives in `reelstore_postgres`.

pub mod error;
pub mod filters;
pub mod movie;
pub mod ports;
pub mod validator;

pub use error::StoreError;
pub use filters::{Filters, Metadata, MovieFilter, Sort, SortDirection, SortKey};
pub use movie::{Movie, MovieDraft};
pub use ports::MovieStore;
pub use validator::Validator;
