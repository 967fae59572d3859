use crate::labels::{format_member_label, format_money};
use squadsplit_application::ParticipantDirectory;
use squadsplit_domain::{
    AmountField, AtomicUnitConversionError, Diagnostic, ExpenseDiagnostic, InvalidInputReason,
    SplitContext, SplitError, SplitWarning, UnbalancedLedger,
};

pub fn format_expense_diagnostic(
    entry: &ExpenseDiagnostic,
    directory: &dyn ParticipantDirectory,
    context: SplitContext,
) -> String {
    let message = match entry.diagnostic {
        Diagnostic::Rejected(error) => format_split_error(error, directory, context),
        Diagnostic::Warning(warning) => format_split_warning(warning, context),
        Diagnostic::ParticipantOutsideScope { participant } => {
            squadsplit_i18n::participant_outside_scope(format_member_label(participant, directory))
        }
    };
    format!("[{}] {message}", entry.expense)
}

pub fn format_unbalanced_ledger(
    residual: &UnbalancedLedger,
    directory: &dyn ParticipantDirectory,
    context: SplitContext,
) -> String {
    squadsplit_i18n::unbalanced_ledger(
        format_member_label(residual.participant, directory),
        format_money(residual.residual, context),
    )
}

fn format_split_error(
    error: SplitError,
    directory: &dyn ParticipantDirectory,
    context: SplitContext,
) -> String {
    match error {
        SplitError::InvalidSplitInput {
            participant,
            reason,
        } => {
            let reason = match reason {
                InvalidInputReason::MissingInput => squadsplit_i18n::MISSING_INPUT,
                InvalidInputReason::NegativeValue => squadsplit_i18n::NEGATIVE_VALUE,
            };
            squadsplit_i18n::invalid_split_input(format_member_label(participant, directory), reason)
        }
        SplitError::EmptyParticipantSet { total } => {
            squadsplit_i18n::empty_participant_set(format_money(total, context))
        }
        SplitError::NegativeTotal { total } => {
            squadsplit_i18n::negative_total(format_money(total, context))
        }
        SplitError::DuplicateParticipant { participant } => {
            squadsplit_i18n::duplicate_participant(format_member_label(participant, directory))
        }
        SplitError::ZeroTotalWeight => squadsplit_i18n::zero_total_weight(),
        SplitError::EmptyLineItem { index } => squadsplit_i18n::empty_line_item(index),
        SplitError::NegativeLineItem { index } => squadsplit_i18n::negative_line_item(index),
        SplitError::Overflow => squadsplit_i18n::overflow(),
        SplitError::InvalidAmount { field, reason } => {
            let field = match field {
                AmountField::Total => squadsplit_i18n::TOTAL_FIELD,
                AmountField::ShareAmount => squadsplit_i18n::SHARE_AMOUNT_FIELD,
                AmountField::LineItemAmount => squadsplit_i18n::LINE_ITEM_FIELD,
            };
            let reason = match reason {
                AtomicUnitConversionError::NonIntegral => squadsplit_i18n::TOO_PRECISE,
                AtomicUnitConversionError::OutOfRange => squadsplit_i18n::OUT_OF_RANGE,
                AtomicUnitConversionError::UnsupportedScale { .. } => {
                    squadsplit_i18n::UNSUPPORTED_SCALE
                }
            };
            squadsplit_i18n::invalid_amount(field, reason)
        }
    }
}

fn format_split_warning(warning: SplitWarning, context: SplitContext) -> String {
    match warning {
        SplitWarning::SumMismatch { expected, assigned } => squadsplit_i18n::sum_mismatch(
            format_money(expected, context),
            format_money(assigned, context),
        ),
        SplitWarning::ItemizedTotalOverridden {
            declared,
            effective,
        } => squadsplit_i18n::itemized_total_overridden(
            format_money(declared, context),
            format_money(effective, context),
        ),
    }
}
