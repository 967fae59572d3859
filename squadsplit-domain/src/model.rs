use fxhash::FxHashMap;
use rust_decimal::Decimal;
use std::{
    collections::BTreeMap,
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticipantId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpenseId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TripId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expense {}", self.0)
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trip {}", self.0)
    }
}

/// Amount in integer minor units (cents at the default scale).
///
/// The scale lives in [`crate::SplitContext`]; `Money` itself is unit-agnostic so all
/// engine arithmetic stays exact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Self = Self(0);

    pub fn from_i64(value: i64) -> Self {
        Self(value)
    }

    pub fn amount(self) -> i64 {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// True when `self` is no further than `tolerance` from zero.
    pub fn is_within(self, tolerance: Money) -> bool {
        self.0.unsigned_abs() <= tolerance.0.unsigned_abs()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Rule used to derive shares from an expense total.
#[derive(Clone, Debug, PartialEq)]
pub enum SplitMode {
    Evenly,
    ByAmount(FxHashMap<ParticipantId, Money>),
    /// Percent values (0..=100 each), not normalized.
    ByPercentage(FxHashMap<ParticipantId, Decimal>),
    /// Relative weights, normalized by their sum.
    ByShares(FxHashMap<ParticipantId, Decimal>),
}

impl SplitMode {
    pub fn name(&self) -> &'static str {
        match self {
            SplitMode::Evenly => "evenly",
            SplitMode::ByAmount(_) => "by_amount",
            SplitMode::ByPercentage(_) => "by_percentage",
            SplitMode::ByShares(_) => "by_shares",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineItem {
    pub amount: Money,
    pub assigned_to: Vec<ParticipantId>,
}

impl LineItem {
    pub fn new(amount: Money, assigned_to: impl IntoIterator<Item = ParticipantId>) -> Self {
        Self {
            amount,
            assigned_to: assigned_to.into_iter().collect(),
        }
    }
}

/// An expense as handed over by the expense store.
///
/// `participants` order is significant only for remainder absorption.
/// When `items` is non-empty the expense is itemized and the split mode is ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct Expense {
    pub id: ExpenseId,
    pub total: Money,
    pub payer: ParticipantId,
    pub participants: Vec<ParticipantId>,
    pub split: SplitMode,
    pub items: Vec<LineItem>,
}

impl Expense {
    pub fn new(
        id: ExpenseId,
        payer: ParticipantId,
        total: Money,
        participants: impl IntoIterator<Item = ParticipantId>,
    ) -> Self {
        Self {
            id,
            total,
            payer,
            participants: participants.into_iter().collect(),
            split: SplitMode::Evenly,
            items: Vec::new(),
        }
    }

    pub fn with_split(mut self, split: SplitMode) -> Self {
        self.split = split;
        self
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = LineItem>) -> Self {
        self.items = items.into_iter().collect();
        self
    }

    pub fn is_itemized(&self) -> bool {
        !self.items.is_empty()
    }
}

/// Mode-specific input kept next to a share for display only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitInput {
    Percentage(Decimal),
    Weight(Decimal),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Share {
    pub participant: ParticipantId,
    pub amount: Money,
    pub input: Option<SplitInput>,
}

/// Net position per participant: positive is owed money, negative owes money.
pub type NetBalances = BTreeMap<ParticipantId, Money>;

/// A directed payment from a debtor to a creditor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Money,
}

impl Settlement {
    /// Expresses a paid settlement as an expense so it can be fed back into aggregation.
    pub fn as_repayment(&self, id: ExpenseId) -> Expense {
        let mut amounts = FxHashMap::default();
        amounts.insert(self.to, self.amount);
        Expense::new(id, self.from, self.amount, [self.to]).with_split(SplitMode::ByAmount(amounts))
    }
}
