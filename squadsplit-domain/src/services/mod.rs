pub mod balance_aggregator;
pub mod counterparty_ledger;
pub mod settlement_reducer;
pub mod split_calculator;

pub use balance_aggregator::{BalanceAccumulator, BalanceAggregator, BalanceReport};
pub use counterparty_ledger::{CounterpartyLedger, CounterpartyPosition};
pub use settlement_reducer::{SettlementPlan, SettlementReducer, apply_settlements};
pub use split_calculator::{SplitCalculator, SplitOutcome, split_evenly};
