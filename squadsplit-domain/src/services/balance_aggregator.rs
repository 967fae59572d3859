use crate::{
    context::{MismatchPolicy, SplitContext},
    diagnostics::{Diagnostic, ExpenseDiagnostic, SplitError},
    model::{Expense, Money, NetBalances, ParticipantId},
    services::split_calculator::{SplitCalculator, SplitOutcome},
};
use fxhash::{FxHashMap, FxHashSet};

/// Net balances for a scope together with the per-expense splits behind them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BalanceReport {
    pub balances: NetBalances,
    pub splits: Vec<SplitOutcome>,
    pub diagnostics: Vec<ExpenseDiagnostic>,
}

impl BalanceReport {
    pub fn total(&self) -> Money {
        self.balances.values().sum()
    }

    pub fn rejected_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|entry| entry.diagnostic.is_rejection())
            .count()
    }
}

/// Folds expenses into net balances one at a time.
///
/// Each expense contributes independently: the payer is credited and every share is
/// debited, so the result does not depend on the order of `apply` calls.
pub struct BalanceAccumulator {
    calculator: SplitCalculator,
    scope: FxHashSet<ParticipantId>,
    report: BalanceReport,
}

impl BalanceAccumulator {
    pub fn new(context: SplitContext) -> Self {
        Self {
            calculator: SplitCalculator::new(context),
            scope: FxHashSet::default(),
            report: BalanceReport::default(),
        }
    }

    /// Starts every scope participant at zero so they appear in the result even without
    /// expenses.
    pub fn new_with_members<I>(context: SplitContext, members: I) -> Self
    where
        I: IntoIterator<Item = ParticipantId>,
    {
        let mut accumulator = Self::new(context);
        for member in members {
            accumulator.scope.insert(member);
            accumulator.report.balances.insert(member, Money::ZERO);
        }
        accumulator
    }

    pub fn apply(&mut self, expense: &Expense) {
        let (outcome, staged) = match self
            .calculator
            .compute_shares(expense)
            .and_then(|outcome| self.stage(&outcome).map(|staged| (outcome, staged)))
        {
            Ok(staged) => staged,
            Err(err) => {
                tracing::warn!(
                    expense_id = expense.id.0,
                    error = %err,
                    "Expense excluded from balances"
                );
                self.push(expense, Diagnostic::Rejected(err));
                return;
            }
        };

        for warning in &outcome.warnings {
            self.push(expense, Diagnostic::Warning(*warning));
        }
        self.check_scope(expense, outcome.payer);
        for share in &outcome.shares {
            self.check_scope(expense, share.participant);
        }

        self.report.balances.extend(staged);
        self.report.splits.push(outcome);
    }

    /// New balances of everyone the expense touches; nothing is written until every
    /// delta fits.
    fn stage(&self, outcome: &SplitOutcome) -> Result<FxHashMap<ParticipantId, Money>, SplitError> {
        let credit = match self.calculator.context().mismatch_policy {
            MismatchPolicy::CreditAssigned => outcome.assigned_total()?,
            MismatchPolicy::CreditTotal => outcome.effective_total,
        };

        let mut staged = FxHashMap::default();
        let deltas = std::iter::once((outcome.payer, credit, true)).chain(
            outcome
                .shares
                .iter()
                .map(|share| (share.participant, share.amount, false)),
        );
        for (participant, amount, is_credit) in deltas {
            let current = staged
                .get(&participant)
                .or_else(|| self.report.balances.get(&participant))
                .copied()
                .unwrap_or(Money::ZERO);
            let updated = if is_credit {
                current.checked_add(amount)
            } else {
                current.checked_sub(amount)
            };
            staged.insert(participant, updated.ok_or(SplitError::Overflow)?);
        }
        Ok(staged)
    }

    pub fn balances(&self) -> &NetBalances {
        &self.report.balances
    }

    pub fn into_report(self) -> BalanceReport {
        tracing::debug!(
            participant_count = self.report.balances.len(),
            expense_count = self.report.splits.len(),
            diagnostic_count = self.report.diagnostics.len(),
            total = self.report.total().amount(),
            "Balances aggregated"
        );
        self.report
    }

    fn check_scope(&mut self, expense: &Expense, participant: ParticipantId) {
        if self.scope.is_empty() || self.scope.contains(&participant) {
            return;
        }
        let diagnostic = Diagnostic::ParticipantOutsideScope { participant };
        let already_reported = self
            .report
            .diagnostics
            .iter()
            .any(|entry| entry.expense == expense.id && entry.diagnostic == diagnostic);
        if !already_reported {
            self.push(expense, diagnostic);
        }
    }

    fn push(&mut self, expense: &Expense, diagnostic: Diagnostic) {
        self.report.diagnostics.push(ExpenseDiagnostic {
            expense: expense.id,
            diagnostic,
        });
    }
}

/// Balance aggregation service.
pub struct BalanceAggregator;

impl BalanceAggregator {
    /// Computes net balances over `expenses` for the given scope.
    ///
    /// Malformed expenses are skipped and reported; the rest of the batch still counts.
    pub fn compute_net_balances<'e, E, I>(
        expenses: E,
        scope_participants: I,
        context: SplitContext,
    ) -> BalanceReport
    where
        E: IntoIterator<Item = &'e Expense>,
        I: IntoIterator<Item = ParticipantId>,
    {
        let mut accumulator = BalanceAccumulator::new_with_members(context, scope_participants);
        for expense in expenses {
            accumulator.apply(expense);
        }
        accumulator.into_report()
    }
}
