use crate::{
    context::SplitContext,
    diagnostics::{InvalidInputReason, SplitError, SplitWarning},
    model::{Expense, ExpenseId, Money, ParticipantId, Share, SplitInput, SplitMode},
};
use fxhash::{FxHashMap, FxHashSet};
use indexmap::IndexMap;
use rust_decimal::{Decimal, prelude::ToPrimitive};

/// Shares computed for one expense, plus non-blocking warnings.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitOutcome {
    pub expense: ExpenseId,
    pub payer: ParticipantId,
    /// Expense total, or the sum of line items for an itemized expense.
    pub effective_total: Money,
    pub shares: Vec<Share>,
    pub warnings: Vec<SplitWarning>,
}

impl SplitOutcome {
    pub fn assigned_total(&self) -> Result<Money, SplitError> {
        self.shares
            .iter()
            .try_fold(Money::ZERO, |acc, share| acc.checked_add(share.amount))
            .ok_or(SplitError::Overflow)
    }

    /// `sum(shares) - total`; zero unless inputs were not normalized.
    pub fn discrepancy(&self) -> Result<Money, SplitError> {
        self.assigned_total()?
            .checked_sub(self.effective_total)
            .ok_or(SplitError::Overflow)
    }

    pub fn share_of(&self, participant: ParticipantId) -> Option<Money> {
        self.shares
            .iter()
            .find(|share| share.participant == participant)
            .map(|share| share.amount)
    }

    pub fn has_sum_mismatch(&self) -> bool {
        self.warnings
            .iter()
            .any(|warning| matches!(warning, SplitWarning::SumMismatch { .. }))
    }
}

/// Translates a single expense into per-participant shares.
pub struct SplitCalculator {
    context: SplitContext,
}

impl SplitCalculator {
    pub fn new(context: SplitContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> SplitContext {
        self.context
    }

    /// Computes each participant's share of `expense`.
    ///
    /// Shares are returned in participant order. Evenly split remainders go to the first
    /// participant; proportional remainders go to the last one.
    pub fn compute_shares(&self, expense: &Expense) -> Result<SplitOutcome, SplitError> {
        if expense.total.is_negative() {
            return Err(SplitError::NegativeTotal {
                total: expense.total,
            });
        }
        ensure_unique(&expense.participants)?;

        let mut outcome = if expense.is_itemized() {
            self.itemized(expense)?
        } else {
            self.by_mode(expense)?
        };
        self.check_sum(&mut outcome)?;

        tracing::debug!(
            expense_id = expense.id.0,
            mode = expense.split.name(),
            itemized = expense.is_itemized(),
            participant_count = expense.participants.len(),
            share_count = outcome.shares.len(),
            effective_total = outcome.effective_total.amount(),
            warning_count = outcome.warnings.len(),
            "Shares computed"
        );

        Ok(outcome)
    }

    fn by_mode(&self, expense: &Expense) -> Result<SplitOutcome, SplitError> {
        let total = expense.total;
        let participants = &expense.participants;

        let shares = match participants.as_slice() {
            [] if total.is_zero() => Vec::new(),
            [] => return Err(SplitError::EmptyParticipantSet { total }),
            [only] => vec![Share {
                participant: *only,
                amount: total,
                input: display_input(&expense.split, *only),
            }],
            _ => match &expense.split {
                SplitMode::Evenly => split_evenly(total, participants)
                    .into_iter()
                    .map(|(participant, amount)| Share {
                        participant,
                        amount,
                        input: None,
                    })
                    .collect(),
                SplitMode::ByAmount(amounts) => by_amount(participants, amounts)?,
                SplitMode::ByPercentage(percentages) => {
                    let inputs = collect_inputs(participants, percentages)?;
                    let percent_sum: Decimal = inputs.iter().sum();
                    proportional(
                        total,
                        participants,
                        &inputs,
                        Decimal::ONE_HUNDRED,
                        percent_sum == Decimal::ONE_HUNDRED,
                        SplitInput::Percentage,
                    )?
                }
                SplitMode::ByShares(weights) => {
                    let inputs = collect_inputs(participants, weights)?;
                    let weight_sum: Decimal = inputs.iter().sum();
                    if weight_sum.is_zero() {
                        return Err(SplitError::ZeroTotalWeight);
                    }
                    proportional(
                        total,
                        participants,
                        &inputs,
                        weight_sum,
                        true,
                        SplitInput::Weight,
                    )?
                }
            },
        };

        Ok(SplitOutcome {
            expense: expense.id,
            payer: expense.payer,
            effective_total: total,
            shares,
            warnings: Vec::new(),
        })
    }

    fn itemized(&self, expense: &Expense) -> Result<SplitOutcome, SplitError> {
        let mut accumulated: IndexMap<ParticipantId, Money> = expense
            .participants
            .iter()
            .map(|participant| (*participant, Money::ZERO))
            .collect();
        let mut effective_total = Money::ZERO;

        for (index, item) in expense.items.iter().enumerate() {
            if item.amount.is_negative() {
                return Err(SplitError::NegativeLineItem { index });
            }
            if item.assigned_to.is_empty() {
                return Err(SplitError::EmptyLineItem { index });
            }
            ensure_unique(&item.assigned_to)?;

            effective_total = effective_total
                .checked_add(item.amount)
                .ok_or(SplitError::Overflow)?;
            for (participant, amount) in split_evenly(item.amount, &item.assigned_to) {
                let entry = accumulated.entry(participant).or_insert(Money::ZERO);
                *entry = entry.checked_add(amount).ok_or(SplitError::Overflow)?;
            }
        }

        let mut warnings = Vec::new();
        if !expense.total.is_zero() && expense.total != effective_total {
            warnings.push(SplitWarning::ItemizedTotalOverridden {
                declared: expense.total,
                effective: effective_total,
            });
        }

        Ok(SplitOutcome {
            expense: expense.id,
            payer: expense.payer,
            effective_total,
            shares: accumulated
                .into_iter()
                .map(|(participant, amount)| Share {
                    participant,
                    amount,
                    input: None,
                })
                .collect(),
            warnings,
        })
    }

    fn check_sum(&self, outcome: &mut SplitOutcome) -> Result<(), SplitError> {
        let assigned = outcome.assigned_total()?;
        if outcome.discrepancy()?.is_within(self.context.tolerance) {
            return Ok(());
        }
        tracing::warn!(
            expense_id = outcome.expense.0,
            expected = outcome.effective_total.amount(),
            assigned = assigned.amount(),
            "Shares do not add up to the expense total"
        );
        outcome.warnings.push(SplitWarning::SumMismatch {
            expected: outcome.effective_total,
            assigned,
        });
        Ok(())
    }
}

/// Divides `total` evenly; the whole rounding remainder goes to the first member.
pub fn split_evenly(total: Money, members: &[ParticipantId]) -> Vec<(ParticipantId, Money)> {
    if members.is_empty() {
        return Vec::new();
    }

    let member_count = members.len() as i64;
    let base = total.amount() / member_count;
    let remainder = total.amount() % member_count;

    members
        .iter()
        .enumerate()
        .map(|(idx, member)| {
            let share = if idx == 0 { base + remainder } else { base };
            (*member, Money::from_i64(share))
        })
        .collect()
}

fn ensure_unique(participants: &[ParticipantId]) -> Result<(), SplitError> {
    let mut seen = FxHashSet::default();
    for participant in participants {
        if !seen.insert(*participant) {
            return Err(SplitError::DuplicateParticipant {
                participant: *participant,
            });
        }
    }
    Ok(())
}

fn display_input(split: &SplitMode, participant: ParticipantId) -> Option<SplitInput> {
    match split {
        SplitMode::ByPercentage(percentages) => percentages
            .get(&participant)
            .copied()
            .map(SplitInput::Percentage),
        SplitMode::ByShares(weights) => weights.get(&participant).copied().map(SplitInput::Weight),
        SplitMode::Evenly | SplitMode::ByAmount(_) => None,
    }
}

fn by_amount(
    participants: &[ParticipantId],
    amounts: &FxHashMap<ParticipantId, Money>,
) -> Result<Vec<Share>, SplitError> {
    participants
        .iter()
        .map(|participant| {
            let amount = amounts
                .get(participant)
                .copied()
                .ok_or(SplitError::InvalidSplitInput {
                    participant: *participant,
                    reason: InvalidInputReason::MissingInput,
                })?;
            if amount.is_negative() {
                return Err(SplitError::InvalidSplitInput {
                    participant: *participant,
                    reason: InvalidInputReason::NegativeValue,
                });
            }
            Ok(Share {
                participant: *participant,
                amount,
                input: None,
            })
        })
        .collect()
}

fn collect_inputs(
    participants: &[ParticipantId],
    inputs: &FxHashMap<ParticipantId, Decimal>,
) -> Result<Vec<Decimal>, SplitError> {
    participants
        .iter()
        .map(|participant| {
            let value = inputs
                .get(participant)
                .copied()
                .ok_or(SplitError::InvalidSplitInput {
                    participant: *participant,
                    reason: InvalidInputReason::MissingInput,
                })?;
            if value.is_sign_negative() && !value.is_zero() {
                return Err(SplitError::InvalidSplitInput {
                    participant: *participant,
                    reason: InvalidInputReason::NegativeValue,
                });
            }
            Ok(value)
        })
        .collect()
}

/// `total * input / denominator`, floored to minor units.
fn proportional(
    total: Money,
    participants: &[ParticipantId],
    inputs: &[Decimal],
    denominator: Decimal,
    absorb_residual: bool,
    tag: fn(Decimal) -> SplitInput,
) -> Result<Vec<Share>, SplitError> {
    let total_units = Decimal::from(total.amount());
    let mut amounts = inputs
        .iter()
        .map(|input| {
            total_units
                .checked_mul(*input)
                .and_then(|value| value.checked_div(denominator))
                .and_then(|value| value.floor().to_i64())
                .map(Money::from_i64)
                .ok_or(SplitError::Overflow)
        })
        .collect::<Result<Vec<_>, _>>()?;

    if absorb_residual {
        let assigned = amounts
            .iter()
            .try_fold(Money::ZERO, |acc, amount| acc.checked_add(*amount))
            .ok_or(SplitError::Overflow)?;
        let residual = total.checked_sub(assigned).ok_or(SplitError::Overflow)?;
        if let Some(last) = amounts.last_mut() {
            *last = last.checked_add(residual).ok_or(SplitError::Overflow)?;
        }
    }

    Ok(participants
        .iter()
        .zip(inputs)
        .zip(amounts)
        .map(|((participant, input), amount)| Share {
            participant: *participant,
            amount,
            input: Some(tag(*input)),
        })
        .collect())
}
