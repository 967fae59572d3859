#![warn(clippy::uninlined_format_args)]

pub mod context;
pub mod diagnostics;
pub mod model;
pub mod services;

pub use context::{AtomicUnitConversionError, MismatchPolicy, SplitContext};
pub use diagnostics::{
    AmountField, Diagnostic, ExpenseDiagnostic, InvalidInputReason, SplitError, SplitWarning, UnbalancedLedger,
};
pub use model::{
    Expense, ExpenseId, LineItem, Money, NetBalances, ParticipantId, Settlement, Share,
    SplitInput, SplitMode, TripId,
};
pub use services::{
    BalanceAccumulator, BalanceAggregator, BalanceReport, CounterpartyLedger,
    CounterpartyPosition, SettlementPlan, SettlementReducer, SplitCalculator, SplitOutcome,
    apply_settlements, split_evenly,
};
