use squadsplit_application::ParticipantDirectory;
use squadsplit_domain::{Money, ParticipantId, SplitContext};
use std::borrow::Cow;

pub fn format_member_label<'a>(
    participant: ParticipantId,
    directory: &'a dyn ParticipantDirectory,
) -> Cow<'a, str> {
    match directory.display_name(participant) {
        Some(name) => Cow::Borrowed(name),
        None => Cow::Owned(participant.to_string()),
    }
}

/// Formats minor units as a currency amount at the context scale (`1234` -> `12.34`).
pub fn format_money(amount: Money, context: SplitContext) -> String {
    context.to_decimal(amount).to_string()
}

/// Like [`format_money`], with an explicit `+` on non-negative amounts.
pub fn format_signed_money(amount: Money, context: SplitContext) -> String {
    let sign = if amount.is_negative() { "" } else { "+" };
    format!("{sign}{}", format_money(amount, context))
}
