use crate::{
    context::SplitContext,
    diagnostics::{Diagnostic, ExpenseDiagnostic, SplitError},
    model::{Expense, Money, ParticipantId},
    services::split_calculator::{SplitCalculator, SplitOutcome},
};
use std::collections::BTreeMap;

/// What one counterparty and the viewer owe each other, kept per direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CounterpartyPosition {
    /// Counterparty's shares of expenses the viewer paid.
    pub owed_to_viewer: Money,
    /// Viewer's shares of expenses the counterparty paid.
    pub owed_by_viewer: Money,
}

impl CounterpartyPosition {
    pub fn net(&self) -> Money {
        self.owed_to_viewer - self.owed_by_viewer
    }
}

/// A viewer's pairwise positions accumulated across every visible expense.
#[derive(Clone, Debug, PartialEq)]
pub struct CounterpartyLedger {
    viewer: ParticipantId,
    positions: BTreeMap<ParticipantId, CounterpartyPosition>,
    diagnostics: Vec<ExpenseDiagnostic>,
}

impl CounterpartyLedger {
    pub fn for_viewer<'e, E>(viewer: ParticipantId, expenses: E, context: SplitContext) -> Self
    where
        E: IntoIterator<Item = &'e Expense>,
    {
        let calculator = SplitCalculator::new(context);
        let mut ledger = Self {
            viewer,
            positions: BTreeMap::new(),
            diagnostics: Vec::new(),
        };

        for expense in expenses {
            ledger.apply(&calculator, expense);
        }

        tracing::debug!(
            viewer = viewer.0,
            counterparty_count = ledger.positions.len(),
            diagnostic_count = ledger.diagnostics.len(),
            "Counterparty ledger built"
        );
        ledger
    }

    fn apply(&mut self, calculator: &SplitCalculator, expense: &Expense) {
        let staged = calculator
            .compute_shares(expense)
            .and_then(|outcome| self.stage(&outcome).map(|staged| (outcome, staged)));
        let (outcome, staged) = match staged {
            Ok(staged) => staged,
            Err(err) => {
                tracing::warn!(
                    expense_id = expense.id.0,
                    viewer = self.viewer.0,
                    error = %err,
                    "Expense excluded from counterparty ledger"
                );
                self.diagnostics.push(ExpenseDiagnostic {
                    expense: expense.id,
                    diagnostic: Diagnostic::Rejected(err),
                });
                return;
            }
        };
        self.diagnostics
            .extend(outcome.warnings.iter().map(|warning| ExpenseDiagnostic {
                expense: expense.id,
                diagnostic: Diagnostic::Warning(*warning),
            }));
        self.positions.extend(staged);
    }

    /// Updated positions for the counterparties the expense touches.
    fn stage(
        &self,
        outcome: &SplitOutcome,
    ) -> Result<Vec<(ParticipantId, CounterpartyPosition)>, SplitError> {
        let mut staged: Vec<(ParticipantId, CounterpartyPosition)> = Vec::new();
        let mut bump = |counterparty: ParticipantId,
                        amount: Money,
                        to_viewer: bool|
         -> Result<(), SplitError> {
            let mut position = staged
                .iter()
                .rev()
                .find(|(id, _)| *id == counterparty)
                .map(|(_, position)| *position)
                .unwrap_or_else(|| self.position(counterparty));
            let side = if to_viewer {
                &mut position.owed_to_viewer
            } else {
                &mut position.owed_by_viewer
            };
            *side = side.checked_add(amount).ok_or(SplitError::Overflow)?;
            staged.push((counterparty, position));
            Ok(())
        };

        if outcome.payer == self.viewer {
            for share in &outcome.shares {
                if share.participant == self.viewer || share.amount.is_zero() {
                    continue;
                }
                bump(share.participant, share.amount, true)?;
            }
        } else if let Some(amount) = outcome.share_of(self.viewer)
            && !amount.is_zero()
        {
            bump(outcome.payer, amount, false)?;
        }
        Ok(staged)
    }

    pub fn viewer(&self) -> ParticipantId {
        self.viewer
    }

    pub fn position(&self, counterparty: ParticipantId) -> CounterpartyPosition {
        self.positions
            .get(&counterparty)
            .copied()
            .unwrap_or_default()
    }

    pub fn positions(&self) -> impl Iterator<Item = (ParticipantId, CounterpartyPosition)> + '_ {
        self.positions
            .iter()
            .map(|(counterparty, position)| (*counterparty, *position))
    }

    /// Counterparties owing the viewer, largest first.
    pub fn owed_to_me(&self) -> Vec<(ParticipantId, Money)> {
        self.directional(|position| position.owed_to_viewer)
    }

    /// Counterparties the viewer owes, largest first.
    pub fn i_owe(&self) -> Vec<(ParticipantId, Money)> {
        self.directional(|position| position.owed_by_viewer)
    }

    pub fn net_total(&self) -> Money {
        self.positions.values().map(CounterpartyPosition::net).sum()
    }

    pub fn diagnostics(&self) -> &[ExpenseDiagnostic] {
        &self.diagnostics
    }

    fn directional<F>(&self, amount_of: F) -> Vec<(ParticipantId, Money)>
    where
        F: Fn(&CounterpartyPosition) -> Money,
    {
        let mut entries: Vec<(ParticipantId, Money)> = self
            .positions
            .iter()
            .map(|(counterparty, position)| (*counterparty, amount_of(position)))
            .filter(|(_, amount)| amount.is_positive())
            .collect();
        entries.sort_by(|(id_a, amount_a), (id_b, amount_b)| {
            amount_b.cmp(amount_a).then_with(|| id_a.cmp(id_b))
        });
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExpenseId, LineItem};

    const ME: ParticipantId = ParticipantId(1);
    const BOB: ParticipantId = ParticipantId(2);
    const CARA: ParticipantId = ParticipantId(3);

    fn cents(value: i64) -> Money {
        Money::from_i64(value)
    }

    #[test]
    fn keeps_both_directions_per_counterparty() {
        let expenses = [
            // trip one: I paid dinner for the three of us
            Expense::new(ExpenseId(1), ME, cents(9_000), [ME, BOB, CARA]),
            // trip two: Bob paid a taxi for the two of us
            Expense::new(ExpenseId(2), BOB, cents(2_000), [ME, BOB]),
        ];

        let ledger = CounterpartyLedger::for_viewer(ME, &expenses, SplitContext::default());

        assert_eq!(
            ledger.position(BOB),
            CounterpartyPosition {
                owed_to_viewer: cents(3_000),
                owed_by_viewer: cents(1_000),
            }
        );
        assert_eq!(ledger.position(BOB).net(), cents(2_000));
        assert_eq!(ledger.owed_to_me(), vec![(BOB, cents(3_000)), (CARA, cents(3_000))]);
        assert_eq!(ledger.i_owe(), vec![(BOB, cents(1_000))]);
        assert_eq!(ledger.net_total(), cents(5_000));
    }

    #[test]
    fn expenses_between_others_are_ignored() {
        let expenses = [Expense::new(ExpenseId(1), BOB, cents(1_000), [BOB, CARA])];

        let ledger = CounterpartyLedger::for_viewer(ME, &expenses, SplitContext::default());

        assert_eq!(ledger.positions().count(), 0);
        assert!(ledger.owed_to_me().is_empty());
        assert!(ledger.i_owe().is_empty());
    }

    #[test]
    fn zero_shares_do_not_create_positions() {
        let expenses = [Expense::new(ExpenseId(1), ME, cents(0), [ME, BOB])
            .with_items([LineItem::new(cents(500), [ME])])];

        let ledger = CounterpartyLedger::for_viewer(ME, &expenses, SplitContext::default());

        assert_eq!(ledger.positions().count(), 0);
    }

    #[test]
    fn rejected_expenses_are_reported() {
        let expenses = [
            Expense::new(ExpenseId(1), ME, cents(-5), [ME, BOB]),
            Expense::new(ExpenseId(2), CARA, cents(400), [ME, CARA]),
        ];

        let ledger = CounterpartyLedger::for_viewer(ME, &expenses, SplitContext::default());

        assert_eq!(ledger.diagnostics().len(), 1);
        assert!(ledger.diagnostics()[0].diagnostic.is_rejection());
        assert_eq!(ledger.i_owe(), vec![(CARA, cents(200))]);
    }

    #[test]
    fn overflowing_position_rejects_only_that_expense() {
        let half = i64::MAX / 2 + 1;
        let expenses = [
            Expense::new(ExpenseId(1), ME, cents(half), [BOB]),
            Expense::new(ExpenseId(2), ME, cents(half), [BOB, CARA]),
            Expense::new(ExpenseId(3), ME, cents(half), [BOB]),
        ];

        let ledger = CounterpartyLedger::for_viewer(ME, &expenses, SplitContext::default());

        assert_eq!(
            ledger.diagnostics(),
            &[ExpenseDiagnostic {
                expense: ExpenseId(3),
                diagnostic: Diagnostic::Rejected(SplitError::Overflow),
            }]
        );
        assert_eq!(ledger.position(BOB).owed_to_viewer, cents(half + half / 2));
        assert_eq!(ledger.position(CARA).owed_to_viewer, cents(half / 2));
    }
}
