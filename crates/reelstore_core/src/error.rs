use std::collections::BTreeMap;

use thiserror::Error;

/// Store-layer error taxonomy. Every operation returns these as typed
/// values; nothing is swallowed inside the store.
///
/// `Connection` and `Integrity` are candidates for caller-level retry with
/// backoff. `EditConflict` is never auto-retried: it must surface to the
/// end user as "someone else modified this resource; retry with fresh data".
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {} field error(s)", .0.len())]
    Validation(BTreeMap<String, String>),

    #[error("record not found")]
    NotFound,

    #[error("unable to update the record due to an edit conflict")]
    EditConflict,

    #[error("integrity violation: {0}")]
    Integrity(String),

    #[error("operation exceeded its deadline")]
    Timeout,

    #[error("storage unavailable: {0}")]
    Connection(String),

    #[error("internal: {0}")]
    Internal(#[from] anyhow::Error),
}

impl StoreError {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_) => 422,
            Self::NotFound => 404,
            Self::EditConflict => 409,
            Self::Integrity(_) => 409,
            Self::Timeout => 504,
            Self::Connection(_) => 503,
            Self::Internal(_) => 500,
        }
    }

    /// Field-attributed messages for a validation failure, if that is what
    /// this error is. All accumulated errors are reported at once so a
    /// single round trip reveals every problem.
    pub fn field_errors(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
