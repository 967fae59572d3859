use crate::{
    diagnostics::UnbalancedLedger,
    model::{Money, NetBalances, ParticipantId, Settlement},
};

/// Transfers that settle a balance map, plus anything they could not settle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SettlementPlan {
    pub settlements: Vec<Settlement>,
    /// Balances left beyond the tolerance when debts and credits did not match.
    pub residuals: Vec<UnbalancedLedger>,
}

impl SettlementPlan {
    pub fn is_balanced(&self) -> bool {
        self.residuals.is_empty()
    }
}

/// Greedy debt simplification.
pub struct SettlementReducer {
    tolerance: Money,
}

impl SettlementReducer {
    pub fn new(tolerance: Money) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }

    /// Reduces net balances to at most `n - 1` directed transfers.
    ///
    /// Debtors are matched largest debt first against creditors largest credit first;
    /// ties fall back to participant id order.
    ///
    /// # Arguments
    /// * `balances` - Net balances (positive: is owed, negative: owes)
    ///
    /// # Returns
    /// Transfers plus any residual that exceeds the tolerance
    pub fn reduce(&self, balances: &NetBalances) -> SettlementPlan {
        let tolerance = self.tolerance;

        let mut debtors: Vec<(ParticipantId, Money)> = balances
            .iter()
            .filter(|(_, balance)| -**balance > tolerance)
            .map(|(id, balance)| (*id, -*balance))
            .collect();
        let mut creditors: Vec<(ParticipantId, Money)> = balances
            .iter()
            .filter(|(_, balance)| **balance > tolerance)
            .map(|(id, balance)| (*id, *balance))
            .collect();

        // Both lists hold outstanding magnitudes: largest first, then by id.
        debtors.sort_by(|(id_a, a), (id_b, b)| b.cmp(a).then_with(|| id_a.cmp(id_b)));
        creditors.sort_by(|(id_a, a), (id_b, b)| b.cmp(a).then_with(|| id_a.cmp(id_b)));

        tracing::debug!(
            debtor_count = debtors.len(),
            creditor_count = creditors.len(),
            tolerance = tolerance.amount(),
            "Settlement reduction started"
        );

        let mut settlements = Vec::with_capacity(debtors.len() + creditors.len());
        let (mut debtor_idx, mut creditor_idx) = (0, 0);

        while debtor_idx < debtors.len() && creditor_idx < creditors.len() {
            let (debtor, owed) = &mut debtors[debtor_idx];
            let (creditor, credit) = &mut creditors[creditor_idx];

            let amount = (*owed).min(*credit);
            if amount > tolerance {
                settlements.push(Settlement {
                    from: *debtor,
                    to: *creditor,
                    amount,
                });
            }
            *owed -= amount;
            *credit -= amount;

            if *owed <= tolerance {
                debtor_idx += 1;
            }
            if *credit <= tolerance {
                creditor_idx += 1;
            }
        }

        let residuals: Vec<UnbalancedLedger> = debtors[debtor_idx..]
            .iter()
            .filter(|(_, owed)| *owed > tolerance)
            .map(|(participant, owed)| UnbalancedLedger {
                participant: *participant,
                residual: -*owed,
            })
            .chain(
                creditors[creditor_idx..]
                    .iter()
                    .filter(|(_, credit)| *credit > tolerance)
                    .map(|(participant, credit)| UnbalancedLedger {
                        participant: *participant,
                        residual: *credit,
                    }),
            )
            .collect();

        for residual in &residuals {
            tracing::error!(
                participant = residual.participant.0,
                residual = residual.residual.amount(),
                tolerance = tolerance.amount(),
                "Balance left unsettled after reduction"
            );
        }

        tracing::debug!(
            settlement_count = settlements.len(),
            residual_count = residuals.len(),
            "Settlement reduction finished"
        );

        SettlementPlan {
            settlements,
            residuals,
        }
    }
}

/// Returns the balances after every settlement has been paid.
pub fn apply_settlements(balances: &NetBalances, settlements: &[Settlement]) -> NetBalances {
    let mut new_balances = balances.clone();
    for settlement in settlements {
        *new_balances.entry(settlement.from).or_insert(Money::ZERO) += settlement.amount;
        *new_balances.entry(settlement.to).or_insert(Money::ZERO) -= settlement.amount;
    }
    new_balances
}
