#![warn(clippy::uninlined_format_args)]

pub mod document;
pub mod error;
pub mod json_store;

pub use document::{
    ExpenseRecord, LedgerDocument, LineItemRecord, MemberRecord, SplitRecord, TripRecord,
};
pub use error::LoadError;
pub use json_store::JsonLedgerStore;
