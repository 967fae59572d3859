//! On-disk shape of a ledger file.
//!
//! Amounts are decimal strings in currency units (`"12.50"`); they are converted to
//! minor units when the store is built.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerDocument {
    #[serde(default)]
    pub members: Vec<MemberRecord>,
    #[serde(default)]
    pub trips: Vec<TripRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub members: Vec<u64>,
    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: u64,
    pub payer: u64,
    #[serde(default)]
    pub total: Decimal,
    /// Empty means "everyone on the trip".
    #[serde(default)]
    pub participants: Vec<u64>,
    #[serde(default)]
    pub split: SplitRecord,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<LineItemRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SplitRecord {
    #[default]
    Evenly,
    ByAmount { amounts: BTreeMap<u64, Decimal> },
    ByPercentage { percentages: BTreeMap<u64, Decimal> },
    ByShares { weights: BTreeMap<u64, Decimal> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemRecord {
    pub amount: Decimal,
    pub assigned_to: Vec<u64>,
}
