use crate::{
    diagnostic_presenter::{format_expense_diagnostic, format_unbalanced_ledger},
    labels::{format_member_label, format_money, format_signed_money},
    text_table::{Alignment, TextTableBuilder},
};
use squadsplit_application::{ParticipantDirectory, TripSummary};
use squadsplit_domain::{NetBalances, Settlement, SplitContext, SplitInput, SplitOutcome};
use squadsplit_i18n as i18n;
use std::borrow::Cow;

pub struct SettlementPresenter;

pub struct SettlementView {
    pub share_table: String,
    pub balance_table: String,
    pub settlement_table: Option<String>,
    pub diagnostics: Vec<String>,
}

impl SettlementPresenter {
    pub fn render(
        summary: &TripSummary,
        directory: &dyn ParticipantDirectory,
        context: SplitContext,
    ) -> SettlementView {
        let share_table = Self::build_share_table(&summary.splits, directory, context);
        let balance_table = Self::build_balance_table(&summary.balances, directory, context);
        let settlement_table = (!summary.settlements.is_empty())
            .then(|| Self::build_settlement_table(&summary.settlements, directory, context));

        let diagnostics = summary
            .diagnostics
            .iter()
            .map(|entry| format_expense_diagnostic(entry, directory, context))
            .chain(
                summary
                    .residuals
                    .iter()
                    .map(|residual| format_unbalanced_ledger(residual, directory, context)),
            )
            .collect();

        SettlementView {
            share_table,
            balance_table,
            settlement_table,
            diagnostics,
        }
    }

    /// One row per share; expense and payer are printed on the first row of each expense.
    pub fn build_share_table(
        splits: &[SplitOutcome],
        directory: &dyn ParticipantDirectory,
        context: SplitContext,
    ) -> String {
        let mut builder = TextTableBuilder::new()
            .alignments(&[
                Alignment::Left,
                Alignment::Left,
                Alignment::Left,
                Alignment::Right,
            ])
            .headers(&[
                Cow::Borrowed(i18n::EXPENSE),
                Cow::Borrowed(i18n::PAYER),
                Cow::Borrowed(i18n::MEMBER),
                Cow::Borrowed(i18n::SHARE),
            ]);

        for split in splits {
            for (idx, share) in split.shares.iter().enumerate() {
                let (expense, payer) = if idx == 0 {
                    (
                        Cow::Owned(split.expense.0.to_string()),
                        format_member_label(split.payer, directory),
                    )
                } else {
                    (Cow::Borrowed(""), Cow::Borrowed(""))
                };
                let amount = match share.input {
                    Some(SplitInput::Percentage(percentage)) => format!(
                        "{} ({}%)",
                        format_money(share.amount, context),
                        percentage.normalize()
                    ),
                    Some(SplitInput::Weight(weight)) => format!(
                        "{} (x{})",
                        format_money(share.amount, context),
                        weight.normalize()
                    ),
                    None => format_money(share.amount, context),
                };
                builder = builder.row([
                    expense,
                    payer,
                    format_member_label(share.participant, directory),
                    Cow::Owned(amount),
                ]);
            }
        }

        builder.build()
    }

    pub fn build_balance_table(
        balances: &NetBalances,
        directory: &dyn ParticipantDirectory,
        context: SplitContext,
    ) -> String {
        let mut builder = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right])
            .headers(&[Cow::Borrowed(i18n::MEMBER), Cow::Borrowed(i18n::BALANCE)]);

        for (participant, balance) in balances {
            builder = builder.row([
                format_member_label(*participant, directory),
                Cow::Owned(format_signed_money(*balance, context)),
            ]);
        }

        builder.build()
    }

    pub fn build_settlement_table(
        settlements: &[Settlement],
        directory: &dyn ParticipantDirectory,
        context: SplitContext,
    ) -> String {
        let mut builder = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Left, Alignment::Right])
            .headers(&[
                Cow::Borrowed(i18n::FROM),
                Cow::Borrowed(i18n::TO),
                Cow::Borrowed(i18n::AMOUNT),
            ]);

        for settlement in settlements {
            builder = builder.row([
                format_member_label(settlement.from, directory),
                format_member_label(settlement.to, directory),
                Cow::Owned(format_money(settlement.amount, context)),
            ]);
        }

        builder.build()
    }
}
