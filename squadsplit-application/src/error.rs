use squadsplit_domain::TripId;
use thiserror::Error;

/// Failure reported by a storage adapter behind one of the ports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{source_name}: {detail}")]
pub struct SourceError {
    pub source_name: &'static str,
    pub detail: String,
}

impl SourceError {
    pub fn new(source_name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            source_name,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("unknown trip: {0}")]
    UnknownTrip(TripId),
    #[error("failed to read ledger data")]
    Source(#[from] SourceError),
}
