use crate::{
    diagnostic_presenter::format_expense_diagnostic,
    labels::{format_member_label, format_money, format_signed_money},
    text_table::{Alignment, TextTableBuilder},
};
use squadsplit_application::{GlobalSummary, ParticipantDirectory};
use squadsplit_domain::{Money, ParticipantId, SplitContext};
use squadsplit_i18n as i18n;
use std::borrow::Cow;

pub struct CounterpartyPresenter;

pub struct CounterpartyView {
    pub owed_to_me_table: Option<String>,
    pub i_owe_table: Option<String>,
    pub position_table: String,
    pub diagnostics: Vec<String>,
}

impl CounterpartyPresenter {
    pub fn render(
        summary: &GlobalSummary,
        directory: &dyn ParticipantDirectory,
        context: SplitContext,
    ) -> CounterpartyView {
        let ledger = &summary.ledger;
        let owed_to_me = ledger.owed_to_me();
        let i_owe = ledger.i_owe();

        let mut position_table = TextTableBuilder::new()
            .alignments(&[
                Alignment::Left,
                Alignment::Right,
                Alignment::Right,
                Alignment::Right,
            ])
            .headers(&[
                Cow::Borrowed(i18n::MEMBER),
                Cow::Borrowed(i18n::OWED_TO_ME),
                Cow::Borrowed(i18n::I_OWE),
                Cow::Borrowed(i18n::NET),
            ]);
        for (counterparty, position) in ledger.positions() {
            position_table = position_table.row([
                format_member_label(counterparty, directory),
                Cow::Owned(format_money(position.owed_to_viewer, context)),
                Cow::Owned(format_money(position.owed_by_viewer, context)),
                Cow::Owned(format_signed_money(position.net(), context)),
            ]);
        }

        CounterpartyView {
            owed_to_me_table: (!owed_to_me.is_empty())
                .then(|| Self::build_direction_table(&owed_to_me, directory, context)),
            i_owe_table: (!i_owe.is_empty())
                .then(|| Self::build_direction_table(&i_owe, directory, context)),
            position_table: position_table.build(),
            diagnostics: summary
                .diagnostics()
                .map(|entry| format_expense_diagnostic(entry, directory, context))
                .collect(),
        }
    }

    pub fn build_direction_table(
        entries: &[(ParticipantId, Money)],
        directory: &dyn ParticipantDirectory,
        context: SplitContext,
    ) -> String {
        TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right])
            .headers(&[Cow::Borrowed(i18n::MEMBER), Cow::Borrowed(i18n::AMOUNT)])
            .rows(entries.iter().map(|(counterparty, amount)| {
                [
                    format_member_label(*counterparty, directory),
                    Cow::Owned(format_money(*amount, context)),
                ]
            }))
            .build()
    }
}
