use crate::{
    error::LedgerError,
    model::{GlobalSummary, TripSummary},
    ports::{ExpenseSource, MembershipSource},
};
use squadsplit_domain::{
    BalanceAggregator, CounterpartyLedger, Expense, ParticipantId, SettlementReducer,
    SplitContext, TripId,
};

/// Builds trip and global views from the ports with one engine configuration.
#[derive(Clone, Copy)]
pub struct LedgerProcessor<'a> {
    expenses: &'a dyn ExpenseSource,
    memberships: &'a dyn MembershipSource,
    context: SplitContext,
}

impl<'a> LedgerProcessor<'a> {
    pub fn new(
        expenses: &'a dyn ExpenseSource,
        memberships: &'a dyn MembershipSource,
        context: SplitContext,
    ) -> Self {
        Self {
            expenses,
            memberships,
            context,
        }
    }

    pub fn context(&self) -> SplitContext {
        self.context
    }

    /// Shares, net balances and suggested settlements for one trip.
    ///
    /// Expenses that cannot be split, or that the source could not read, are left out of
    /// the balances and reported in `diagnostics`; they never fail the whole summary.
    pub fn trip_summary(&self, trip: TripId) -> Result<TripSummary, LedgerError> {
        let members = self
            .memberships
            .members_of(trip)?
            .ok_or(LedgerError::UnknownTrip(trip))?;
        let expenses = self.expenses.expenses_for_trip(trip)?;
        let expenses = Self::with_member_fallback(expenses, &members);
        let mut diagnostics = self.expenses.unreadable_for_trip(trip)?;

        let report =
            BalanceAggregator::compute_net_balances(&expenses, members.iter().copied(), self.context);
        let plan = SettlementReducer::new(self.context.tolerance).reduce(&report.balances);

        tracing::info!(
            trip = trip.0,
            expense_count = expenses.len(),
            settlement_count = plan.settlements.len(),
            diagnostic_count = report.diagnostics.len() + diagnostics.len(),
            "Trip summary built"
        );

        diagnostics.extend(report.diagnostics);
        Ok(TripSummary {
            trip,
            members,
            splits: report.splits,
            balances: report.balances,
            settlements: plan.settlements,
            residuals: plan.residuals,
            diagnostics,
        })
    }

    /// The viewer's gross positions against each counterparty across every trip.
    pub fn global_summary(&self, viewer: ParticipantId) -> Result<GlobalSummary, LedgerError> {
        let expenses = self.expenses.expenses_visible_to(viewer)?;
        let unreadable = self.expenses.unreadable_visible_to(viewer)?;
        let ledger = CounterpartyLedger::for_viewer(viewer, &expenses, self.context);

        tracing::info!(
            viewer = viewer.0,
            expense_count = expenses.len(),
            unreadable_count = unreadable.len(),
            "Global summary built"
        );

        Ok(GlobalSummary { ledger, unreadable })
    }

    /// Expenses recorded without participants are split across the trip roster.
    fn with_member_fallback(expenses: Vec<Expense>, members: &[ParticipantId]) -> Vec<Expense> {
        expenses
            .into_iter()
            .map(|mut expense| {
                if expense.participants.is_empty() && !expense.is_itemized() {
                    tracing::debug!(
                        expense_id = expense.id.0,
                        member_count = members.len(),
                        "Expense participants resolved from trip membership"
                    );
                    expense.participants = members.to_vec();
                }
                expense
            })
            .collect()
    }
}
