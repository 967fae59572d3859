#![warn(clippy::uninlined_format_args)]

pub mod counterparty_presenter;
pub mod diagnostic_presenter;
pub mod labels;
pub mod settlement_presenter;
pub mod text_table;

pub use counterparty_presenter::{CounterpartyPresenter, CounterpartyView};
pub use diagnostic_presenter::{format_expense_diagnostic, format_unbalanced_ledger};
pub use labels::{format_member_label, format_money, format_signed_money};
pub use settlement_presenter::{SettlementPresenter, SettlementView};
pub use text_table::{Alignment, TextTableBuilder};
