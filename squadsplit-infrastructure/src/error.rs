use squadsplit_domain::{ExpenseId, TripId};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed ledger document")]
    Json(#[from] serde_json::Error),
    #[error("{0} is declared more than once")]
    DuplicateTrip(TripId),
    #[error("{0} is declared more than once")]
    DuplicateExpense(ExpenseId),
}
