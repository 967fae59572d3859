use crate::{
    document::{ExpenseRecord, LedgerDocument, LineItemRecord, SplitRecord},
    error::LoadError,
};
use fxhash::{FxHashMap, FxHashSet};
use rust_decimal::Decimal;
use squadsplit_application::{
    ExpenseSource, MembershipSource, ParticipantDirectory, SourceError,
};
use squadsplit_domain::{
    AmountField, Diagnostic, Expense, ExpenseDiagnostic, ExpenseId, LineItem, ParticipantId,
    SplitContext, SplitError, SplitMode, TripId,
};
use std::{collections::BTreeMap, fs, path::Path};

const SOURCE_NAME: &str = "json-ledger";

#[derive(Debug, Clone)]
struct Trip {
    name: String,
    members: Vec<ParticipantId>,
    expenses: Vec<Expense>,
    unreadable: Vec<Unreadable>,
}

/// A recorded expense whose amounts did not convert, kept for reporting.
#[derive(Debug, Clone)]
struct Unreadable {
    diagnostic: ExpenseDiagnostic,
    /// Payer, participants and item assignees as recorded; empty participants on a
    /// non-itemized record mean the whole roster.
    involved: Vec<ParticipantId>,
    uses_roster: bool,
}

/// Read-only ledger loaded from a JSON document.
///
/// Amounts are converted to minor units once, at load time, with the scale of the
/// supplied [`SplitContext`]. An expense whose amounts do not convert is set aside and
/// reported through [`ExpenseSource::unreadable_for_trip`]; only malformed JSON and
/// duplicate ids fail the load.
#[derive(Debug, Clone)]
pub struct JsonLedgerStore {
    names: FxHashMap<ParticipantId, String>,
    trips: BTreeMap<TripId, Trip>,
}

impl JsonLedgerStore {
    pub fn from_path(path: &Path, context: SplitContext) -> Result<Self, LoadError> {
        let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_json(&raw, context)?;
        tracing::info!(
            path = %path.display(),
            trip_count = store.trips.len(),
            member_count = store.names.len(),
            "Ledger loaded"
        );
        Ok(store)
    }

    pub fn from_json(raw: &str, context: SplitContext) -> Result<Self, LoadError> {
        let document: LedgerDocument = serde_json::from_str(raw)?;
        Self::from_document(document, context)
    }

    pub fn from_document(document: LedgerDocument, context: SplitContext) -> Result<Self, LoadError> {
        let names = document
            .members
            .into_iter()
            .map(|member| (ParticipantId(member.id), member.name))
            .collect();

        let mut trips = BTreeMap::new();
        let mut seen_expenses = FxHashSet::default();
        for trip in document.trips {
            let trip_id = TripId(trip.id);
            let mut expenses = Vec::with_capacity(trip.expenses.len());
            let mut unreadable = Vec::new();
            for record in trip.expenses {
                if !seen_expenses.insert(record.id) {
                    return Err(LoadError::DuplicateExpense(ExpenseId(record.id)));
                }
                let involved = involved_in(&record);
                let uses_roster = record.participants.is_empty() && record.items.is_empty();
                match to_expense(record, context) {
                    Ok(expense) => expenses.push(expense),
                    Err(entry) => {
                        tracing::warn!(
                            source = SOURCE_NAME,
                            trip = trip_id.0,
                            expense_id = entry.expense.0,
                            diagnostic = ?entry.diagnostic,
                            "Expense amounts could not be converted"
                        );
                        unreadable.push(Unreadable {
                            diagnostic: entry,
                            involved,
                            uses_roster,
                        });
                    }
                }
            }
            let converted = Trip {
                name: trip.name,
                members: trip.members.into_iter().map(ParticipantId).collect(),
                expenses,
                unreadable,
            };
            if trips.insert(trip_id, converted).is_some() {
                return Err(LoadError::DuplicateTrip(trip_id));
            }
        }

        Ok(Self { names, trips })
    }

    /// Trip ids with their display names, in id order.
    pub fn trips(&self) -> impl Iterator<Item = (TripId, &str)> + '_ {
        self.trips
            .iter()
            .map(|(id, trip)| (*id, trip.name.as_str()))
    }
}

fn to_expense(record: ExpenseRecord, context: SplitContext) -> Result<Expense, ExpenseDiagnostic> {
    let id = ExpenseId(record.id);
    let money = |value: Decimal, field: AmountField| {
        context
            .to_minor_units(value)
            .map_err(|reason| ExpenseDiagnostic {
                expense: id,
                diagnostic: Diagnostic::Rejected(SplitError::InvalidAmount { field, reason }),
            })
    };

    let split = match record.split {
        SplitRecord::Evenly => SplitMode::Evenly,
        SplitRecord::ByAmount { amounts } => SplitMode::ByAmount(
            amounts
                .into_iter()
                .map(|(participant, amount)| {
                    Ok((ParticipantId(participant), money(amount, AmountField::ShareAmount)?))
                })
                .collect::<Result<_, ExpenseDiagnostic>>()?,
        ),
        SplitRecord::ByPercentage { percentages } => {
            SplitMode::ByPercentage(by_participant(percentages))
        }
        SplitRecord::ByShares { weights } => SplitMode::ByShares(by_participant(weights)),
    };

    let items = record
        .items
        .into_iter()
        .map(|LineItemRecord { amount, assigned_to }| {
            Ok(LineItem::new(
                money(amount, AmountField::LineItemAmount)?,
                assigned_to.into_iter().map(ParticipantId),
            ))
        })
        .collect::<Result<Vec<_>, ExpenseDiagnostic>>()?;

    Ok(Expense::new(
        id,
        ParticipantId(record.payer),
        money(record.total, AmountField::Total)?,
        record.participants.into_iter().map(ParticipantId),
    )
    .with_split(split)
    .with_items(items))
}

fn involved_in(record: &ExpenseRecord) -> Vec<ParticipantId> {
    std::iter::once(record.payer)
        .chain(record.participants.iter().copied())
        .chain(record.items.iter().flat_map(|item| item.assigned_to.iter().copied()))
        .map(ParticipantId)
        .collect()
}

fn by_participant(values: BTreeMap<u64, Decimal>) -> FxHashMap<ParticipantId, Decimal> {
    values
        .into_iter()
        .map(|(participant, value)| (ParticipantId(participant), value))
        .collect()
}

impl ExpenseSource for JsonLedgerStore {
    fn expenses_for_trip(&self, trip: TripId) -> Result<Vec<Expense>, SourceError> {
        Ok(self
            .trips
            .get(&trip)
            .map(|trip| trip.expenses.clone())
            .unwrap_or_default())
    }

    fn expenses_visible_to(&self, viewer: ParticipantId) -> Result<Vec<Expense>, SourceError> {
        let visible = self
            .trips
            .values()
            .flat_map(|trip| {
                trip.expenses.iter().filter(move |expense| {
                    expense.payer == viewer
                        || expense.participants.contains(&viewer)
                        || expense
                            .items
                            .iter()
                            .any(|item| item.assigned_to.contains(&viewer))
                        || (expense.participants.is_empty()
                            && !expense.is_itemized()
                            && trip.members.contains(&viewer))
                })
                .map(move |expense| with_roster(expense, &trip.members))
            })
            .collect::<Vec<_>>();
        tracing::debug!(
            source = SOURCE_NAME,
            viewer = viewer.0,
            expense_count = visible.len(),
            "Visible expenses collected"
        );
        Ok(visible)
    }

    fn unreadable_for_trip(&self, trip: TripId) -> Result<Vec<ExpenseDiagnostic>, SourceError> {
        Ok(self
            .trips
            .get(&trip)
            .map(|trip| trip.unreadable.iter().map(|entry| entry.diagnostic).collect())
            .unwrap_or_default())
    }

    fn unreadable_visible_to(
        &self,
        viewer: ParticipantId,
    ) -> Result<Vec<ExpenseDiagnostic>, SourceError> {
        Ok(self
            .trips
            .values()
            .flat_map(|trip| {
                trip.unreadable
                    .iter()
                    .filter(move |entry| {
                        entry.involved.contains(&viewer)
                            || (entry.uses_roster && trip.members.contains(&viewer))
                    })
                    .map(|entry| entry.diagnostic)
            })
            .collect())
    }
}

/// Cross-trip reads have no trip context downstream, so the roster is filled in here.
fn with_roster(expense: &Expense, members: &[ParticipantId]) -> Expense {
    let mut expense = expense.clone();
    if expense.participants.is_empty() && !expense.is_itemized() {
        expense.participants = members.to_vec();
    }
    expense
}

impl MembershipSource for JsonLedgerStore {
    fn members_of(&self, trip: TripId) -> Result<Option<Vec<ParticipantId>>, SourceError> {
        Ok(self.trips.get(&trip).map(|trip| trip.members.clone()))
    }
}

impl ParticipantDirectory for JsonLedgerStore {
    fn display_name(&self, participant: ParticipantId) -> Option<&str> {
        self.names.get(&participant).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use squadsplit_application::LedgerProcessor;
    use squadsplit_domain::{AtomicUnitConversionError, Money, Settlement};

    const LEDGER: &str = r#"{
        "members": [
            { "id": 1, "name": "Ana" },
            { "id": 2, "name": "Ben" },
            { "id": 3, "name": "Cy" }
        ],
        "trips": [
            {
                "id": 10,
                "name": "Lisbon",
                "members": [1, 2, 3],
                "expenses": [
                    { "id": 1, "payer": 1, "total": "90.00", "participants": [1, 2, 3] },
                    {
                        "id": 2, "payer": 2, "total": "100.00", "participants": [1, 2],
                        "split": { "mode": "by_percentage", "percentages": { "1": "60", "2": "40" } }
                    },
                    { "id": 3, "payer": 3, "total": "12.34" },
                    {
                        "id": 4, "payer": 1, "participants": [1, 2],
                        "items": [
                            { "amount": "7.50", "assigned_to": [2] },
                            { "amount": "3.00", "assigned_to": [1, 2] }
                        ]
                    }
                ]
            },
            {
                "id": 20,
                "name": "Porto",
                "members": [2, 3],
                "expenses": [
                    {
                        "id": 5, "payer": 3, "total": "20.00", "participants": [2, 3],
                        "split": { "mode": "by_amount", "amounts": { "2": "5.00", "3": "15.00" } }
                    }
                ]
            }
        ]
    }"#;

    #[fixture]
    fn store() -> JsonLedgerStore {
        JsonLedgerStore::from_json(LEDGER, SplitContext::default()).expect("valid ledger")
    }

    #[rstest]
    fn loads_trips_members_and_names(store: JsonLedgerStore) {
        let trips: Vec<_> = store.trips().collect();
        assert_eq!(trips, vec![(TripId(10), "Lisbon"), (TripId(20), "Porto")]);
        assert_eq!(
            store.members_of(TripId(20)).expect("members"),
            Some(vec![ParticipantId(2), ParticipantId(3)])
        );
        assert_eq!(store.members_of(TripId(99)).expect("members"), None);
        assert_eq!(store.display_name(ParticipantId(2)), Some("Ben"));
        assert_eq!(store.display_name(ParticipantId(9)), None);
    }

    #[rstest]
    fn converts_amounts_to_minor_units(store: JsonLedgerStore) {
        let expenses = store.expenses_for_trip(TripId(10)).expect("expenses");

        assert_eq!(expenses.len(), 4);
        assert_eq!(expenses[0].total, Money::from_i64(9_000));
        assert_eq!(expenses[0].split, SplitMode::Evenly);
        assert!(matches!(
            &expenses[1].split,
            SplitMode::ByPercentage(percentages)
                if percentages[&ParticipantId(1)] == Decimal::from(60)
        ));
        assert_eq!(
            expenses[3].items,
            vec![
                LineItem::new(Money::from_i64(750), [ParticipantId(2)]),
                LineItem::new(Money::from_i64(300), [ParticipantId(1), ParticipantId(2)]),
            ]
        );
        assert!(expenses[3].total.is_zero());

        let porto = store.expenses_for_trip(TripId(20)).expect("expenses");
        let SplitMode::ByAmount(amounts) = &porto[0].split else {
            panic!("expected by-amount split");
        };
        assert_eq!(amounts[&ParticipantId(3)], Money::from_i64(1_500));
    }

    #[rstest]
    #[case::payer_and_participant(ParticipantId(1), vec![1, 2, 3, 4])]
    #[case::across_trips(ParticipantId(2), vec![1, 2, 3, 4, 5])]
    #[case::roster_only(ParticipantId(3), vec![1, 3, 5])]
    #[case::stranger(ParticipantId(9), vec![])]
    fn visible_expenses_include_roster_fallback(
        store: JsonLedgerStore,
        #[case] viewer: ParticipantId,
        #[case] expected: Vec<u64>,
    ) {
        let visible = store.expenses_visible_to(viewer).expect("expenses");

        let ids: Vec<u64> = visible.iter().map(|expense| expense.id.0).collect();
        assert_eq!(ids, expected);
        assert!(
            visible
                .iter()
                .filter(|expense| !expense.is_itemized())
                .all(|expense| !expense.participants.is_empty())
        );
    }

    #[test]
    fn unconvertible_amounts_set_aside_only_their_expenses() {
        let raw = r#"{ "trips": [ { "id": 1, "members": [1, 2],
            "expenses": [
                { "id": 7, "payer": 1, "total": "1.005", "participants": [1] },
                { "id": 8, "payer": 2, "total": "4.00", "participants": [1, 2] },
                {
                    "id": 9, "payer": 2, "total": "3.00", "participants": [1, 2],
                    "split": { "mode": "by_amount", "amounts": { "1": "1.50", "2": "1.505" } }
                }
            ] } ] }"#;

        let store = JsonLedgerStore::from_json(raw, SplitContext::default()).expect("valid ledger");

        let expenses = store.expenses_for_trip(TripId(1)).expect("expenses");
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].id, ExpenseId(8));
        assert_eq!(
            store.unreadable_for_trip(TripId(1)).expect("unreadable"),
            vec![
                ExpenseDiagnostic {
                    expense: ExpenseId(7),
                    diagnostic: Diagnostic::Rejected(SplitError::InvalidAmount {
                        field: AmountField::Total,
                        reason: AtomicUnitConversionError::NonIntegral,
                    }),
                },
                ExpenseDiagnostic {
                    expense: ExpenseId(9),
                    diagnostic: Diagnostic::Rejected(SplitError::InvalidAmount {
                        field: AmountField::ShareAmount,
                        reason: AtomicUnitConversionError::NonIntegral,
                    }),
                },
            ]
        );
        assert!(store.unreadable_for_trip(TripId(2)).expect("unreadable").is_empty());
    }

    #[test]
    fn trip_with_unreadable_expense_still_summarizes_the_rest() {
        let raw = r#"{ "trips": [ { "id": 1, "members": [1, 2],
            "expenses": [
                { "id": 7, "payer": 1, "total": "1.005", "participants": [1, 2] },
                { "id": 8, "payer": 2, "total": "4.00" }
            ] } ] }"#;
        let store = JsonLedgerStore::from_json(raw, SplitContext::default()).expect("valid ledger");
        let processor = LedgerProcessor::new(&store, &store, SplitContext::default());

        let summary = processor.trip_summary(TripId(1)).expect("summary");

        assert_eq!(summary.splits.len(), 1);
        assert_eq!(summary.balances[&ParticipantId(1)], Money::from_i64(-200));
        assert_eq!(summary.balances[&ParticipantId(2)], Money::from_i64(200));
        assert_eq!(
            summary.settlements,
            vec![Settlement {
                from: ParticipantId(1),
                to: ParticipantId(2),
                amount: Money::from_i64(200),
            }]
        );
        assert_eq!(summary.diagnostics.len(), 1);
        assert_eq!(summary.diagnostics[0].expense, ExpenseId(7));
        assert!(summary.diagnostics[0].diagnostic.is_rejection());
    }

    #[rstest]
    #[case::payer(ParticipantId(1), vec![7, 8])]
    #[case::roster_member(ParticipantId(2), vec![8])]
    #[case::stranger(ParticipantId(9), vec![])]
    fn unreadable_expenses_follow_visibility(
        #[case] viewer: ParticipantId,
        #[case] expected: Vec<u64>,
    ) {
        let raw = r#"{ "trips": [ { "id": 1, "members": [1, 2],
            "expenses": [
                { "id": 7, "payer": 1, "total": "0.001", "participants": [1] },
                { "id": 8, "payer": 1, "total": "0.002" }
            ] } ] }"#;
        let store = JsonLedgerStore::from_json(raw, SplitContext::default()).expect("valid ledger");

        let unreadable = store.unreadable_visible_to(viewer).expect("unreadable");

        let ids: Vec<u64> = unreadable.iter().map(|entry| entry.expense.0).collect();
        assert_eq!(ids, expected);
    }

    #[rstest]
    #[case::trip(
        r#"{ "trips": [ { "id": 1, "members": [] }, { "id": 1, "members": [] } ] }"#
    )]
    #[case::expense(
        r#"{ "trips": [
            { "id": 1, "members": [1], "expenses": [ { "id": 3, "payer": 1, "total": "1" } ] },
            { "id": 2, "members": [1], "expenses": [ { "id": 3, "payer": 1, "total": "1" } ] }
        ] }"#
    )]
    fn rejects_duplicate_ids(#[case] raw: &str) {
        let err = JsonLedgerStore::from_json(raw, SplitContext::default()).unwrap_err();

        assert!(matches!(
            err,
            LoadError::DuplicateTrip(_) | LoadError::DuplicateExpense(_)
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = JsonLedgerStore::from_json("{ \"trips\": 3 }", SplitContext::default()).unwrap_err();

        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn zero_decimal_scale_accepts_whole_amounts() {
        let raw = r#"{ "trips": [ { "id": 1, "members": [1, 2],
            "expenses": [ { "id": 1, "payer": 1, "total": "1200" } ] } ] }"#;

        let store = JsonLedgerStore::from_json(raw, SplitContext::with_scale(0)).expect("valid ledger");

        let expenses = store.expenses_for_trip(TripId(1)).expect("expenses");
        assert_eq!(expenses[0].total, Money::from_i64(1_200));
        assert!(expenses[0].participants.is_empty());
    }

    #[test]
    fn loads_demo_ledger_from_disk() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../demos/ledger.json");

        let store = JsonLedgerStore::from_path(&path, SplitContext::default()).expect("demo ledger");

        assert_eq!(store.trips().count(), 2);
        assert_eq!(store.expenses_for_trip(TripId(10)).expect("expenses").len(), 4);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = JsonLedgerStore::from_path(Path::new("/nonexistent/ledger.json"), SplitContext::default())
            .unwrap_err();

        assert!(matches!(err, LoadError::Io { .. }));
    }
}
