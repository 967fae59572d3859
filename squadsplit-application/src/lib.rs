#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod ledger_processor;
pub mod model;
pub mod ports;

pub use error::{LedgerError, SourceError};
pub use ledger_processor::LedgerProcessor;
pub use model::{GlobalSummary, TripSummary};
pub use ports::{ExpenseSource, MembershipSource, ParticipantDirectory};
