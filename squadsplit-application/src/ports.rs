use crate::error::SourceError;
use squadsplit_domain::{Expense, ExpenseDiagnostic, ParticipantId, TripId};
use std::collections::HashMap;

/// Read access to recorded expenses.
pub trait ExpenseSource: Send + Sync {
    /// Every expense recorded for `trip`, in any order.
    fn expenses_for_trip(&self, trip: TripId) -> Result<Vec<Expense>, SourceError>;

    /// Every expense, across all trips, whose payer or participants include `viewer`.
    fn expenses_visible_to(&self, viewer: ParticipantId) -> Result<Vec<Expense>, SourceError>;

    /// Expenses of `trip` the source holds but could not turn into an [`Expense`].
    fn unreadable_for_trip(&self, _trip: TripId) -> Result<Vec<ExpenseDiagnostic>, SourceError> {
        Ok(Vec::new())
    }

    /// Unreadable expenses that `viewer` would otherwise see.
    fn unreadable_visible_to(
        &self,
        _viewer: ParticipantId,
    ) -> Result<Vec<ExpenseDiagnostic>, SourceError> {
        Ok(Vec::new())
    }
}

pub trait MembershipSource: Send + Sync {
    /// Members of `trip`, or `None` when the trip is unknown.
    fn members_of(&self, trip: TripId) -> Result<Option<Vec<ParticipantId>>, SourceError>;
}

pub trait ParticipantDirectory: Send + Sync {
    fn display_name(&self, participant: ParticipantId) -> Option<&str>;
}

impl ParticipantDirectory for HashMap<ParticipantId, String> {
    fn display_name(&self, participant: ParticipantId) -> Option<&str> {
        self.get(&participant).map(String::as_str)
    }
}
