use crate::{
    context::AtomicUnitConversionError,
    model::{ExpenseId, Money, ParticipantId},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidInputReason {
    MissingInput,
    NegativeValue,
}

/// Which recorded amount of an expense failed to convert to minor units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AmountField {
    Total,
    ShareAmount,
    LineItemAmount,
}

impl std::fmt::Display for AmountField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            AmountField::Total => "total",
            AmountField::ShareAmount => "share amount",
            AmountField::LineItemAmount => "line item amount",
        })
    }
}

/// Conditions that exclude a single expense from aggregation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    #[error("split input for participant {participant} is invalid ({reason:?})")]
    InvalidSplitInput {
        participant: ParticipantId,
        reason: InvalidInputReason,
    },
    #[error("total {total} has no participants to split among")]
    EmptyParticipantSet { total: Money },
    #[error("total {total} is negative")]
    NegativeTotal { total: Money },
    #[error("participant {participant} is listed more than once")]
    DuplicateParticipant { participant: ParticipantId },
    #[error("share weights sum to zero")]
    ZeroTotalWeight,
    #[error("line item {index} is not assigned to anyone")]
    EmptyLineItem { index: usize },
    #[error("line item {index} has a negative amount")]
    NegativeLineItem { index: usize },
    #[error("amount overflow while splitting")]
    Overflow,
    #[error("{field} cannot be represented in minor units: {reason}")]
    InvalidAmount {
        field: AmountField,
        reason: AtomicUnitConversionError,
    },
}

/// Non-blocking conditions reported next to computed shares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitWarning {
    /// Shares do not add up to the total; `assigned - expected` is the gap.
    SumMismatch { expected: Money, assigned: Money },
    /// Item amounts replaced the separately entered total.
    ItemizedTotalOverridden { declared: Money, effective: Money },
}

impl SplitWarning {
    pub fn discrepancy(&self) -> Money {
        match *self {
            SplitWarning::SumMismatch { expected, assigned } => assigned - expected,
            SplitWarning::ItemizedTotalOverridden {
                declared,
                effective,
            } => effective - declared,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    Rejected(SplitError),
    Warning(SplitWarning),
    ParticipantOutsideScope { participant: ParticipantId },
}

impl Diagnostic {
    pub fn is_rejection(&self) -> bool {
        matches!(self, Diagnostic::Rejected(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExpenseDiagnostic {
    pub expense: ExpenseId,
    pub diagnostic: Diagnostic,
}

/// A balance left over after settlement reduction beyond the tolerance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnbalancedLedger {
    pub participant: ParticipantId,
    pub residual: Money,
}
