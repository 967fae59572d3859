use squadsplit_domain::{
    CounterpartyLedger, ExpenseDiagnostic, NetBalances, ParticipantId, Settlement, SplitOutcome,
    TripId, UnbalancedLedger,
};

/// Everything a trip's ledger screen shows.
#[derive(Debug, Clone, PartialEq)]
pub struct TripSummary {
    pub trip: TripId,
    pub members: Vec<ParticipantId>,
    pub splits: Vec<SplitOutcome>,
    pub balances: NetBalances,
    pub settlements: Vec<Settlement>,
    pub residuals: Vec<UnbalancedLedger>,
    pub diagnostics: Vec<ExpenseDiagnostic>,
}

impl TripSummary {
    pub fn is_settled(&self) -> bool {
        self.settlements.is_empty() && self.residuals.is_empty()
    }
}

/// A viewer's positions against everyone they share expenses with, across trips.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalSummary {
    pub ledger: CounterpartyLedger,
    /// Visible expenses the source could not read.
    pub unreadable: Vec<ExpenseDiagnostic>,
}

impl GlobalSummary {
    pub fn diagnostics(&self) -> impl Iterator<Item = &ExpenseDiagnostic> + '_ {
        self.unreadable.iter().chain(self.ledger.diagnostics())
    }

    pub fn viewer(&self) -> ParticipantId {
        self.ledger.viewer()
    }
}
