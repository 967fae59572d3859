#[cfg(all(feature = "ja", feature = "en"))]
compile_error!("Cannot enable both 'ja' and 'en' features at the same time");

#[cfg(feature = "ja")]
pub mod strings {
    pub const MEMBER: &str = "メンバー";
    pub const BALANCE: &str = "収支";
    pub const FROM: &str = "支払人";
    pub const TO: &str = "受取人";
    pub const AMOUNT: &str = "金額";
    pub const EXPENSE: &str = "支出";
    pub const PAYER: &str = "立替人";
    pub const SHARE: &str = "負担額";
    pub const OWED_TO_ME: &str = "受け取る予定";
    pub const I_OWE: &str = "支払う予定";
    pub const NET: &str = "差引";
    pub const ALL_SETTLED: &str = "精算は不要です";
    pub const MISSING_INPUT: &str = "入力がありません";
    pub const NEGATIVE_VALUE: &str = "負の値です";
    pub const TOTAL_FIELD: &str = "合計";
    pub const SHARE_AMOUNT_FIELD: &str = "負担額";
    pub const LINE_ITEM_FIELD: &str = "明細の金額";
    pub const TOO_PRECISE: &str = "最小単位より細かい値です";
    pub const OUT_OF_RANGE: &str = "扱える範囲を超えています";
    pub const UNSUPPORTED_SCALE: &str = "小数点以下の桁数が扱えません";
}

#[cfg(not(feature = "ja"))]
pub mod strings {
    pub const MEMBER: &str = "Member";
    pub const BALANCE: &str = "Balance";
    pub const FROM: &str = "From";
    pub const TO: &str = "To";
    pub const AMOUNT: &str = "Amount";
    pub const EXPENSE: &str = "Expense";
    pub const PAYER: &str = "Paid by";
    pub const SHARE: &str = "Share";
    pub const OWED_TO_ME: &str = "Owed to me";
    pub const I_OWE: &str = "I owe";
    pub const NET: &str = "Net";
    pub const ALL_SETTLED: &str = "Everyone is settled up";
    pub const MISSING_INPUT: &str = "no input given";
    pub const NEGATIVE_VALUE: &str = "negative value";
    pub const TOTAL_FIELD: &str = "total";
    pub const SHARE_AMOUNT_FIELD: &str = "share amount";
    pub const LINE_ITEM_FIELD: &str = "line item amount";
    pub const TOO_PRECISE: &str = "finer than the minor unit";
    pub const OUT_OF_RANGE: &str = "out of range";
    pub const UNSUPPORTED_SCALE: &str = "unsupported decimal scale";
}

pub use strings::*;

use std::fmt::Display;

#[cfg(feature = "ja")]
mod messages {
    use super::Display;

    pub fn invalid_split_input(participant: impl Display, reason: impl Display) -> String {
        format!("{participant} の分担入力が不正です ({reason})")
    }

    pub fn empty_participant_set(total: impl Display) -> String {
        format!("{total} を分担する参加者がいません")
    }

    pub fn negative_total(total: impl Display) -> String {
        format!("合計 {total} が負の値です")
    }

    pub fn duplicate_participant(participant: impl Display) -> String {
        format!("{participant} が重複して指定されています")
    }

    pub fn zero_total_weight() -> String {
        "比率の合計が 0 です".to_string()
    }

    pub fn empty_line_item(index: usize) -> String {
        format!("明細 {index} に担当者がいません")
    }

    pub fn negative_line_item(index: usize) -> String {
        format!("明細 {index} の金額が負の値です")
    }

    pub fn overflow() -> String {
        "金額が大きすぎて計算できません".to_string()
    }

    pub fn invalid_amount(field: impl Display, reason: impl Display) -> String {
        format!("{field}を読み込めません（{reason}）")
    }

    pub fn sum_mismatch(expected: impl Display, assigned: impl Display) -> String {
        format!("分担額の合計 {assigned} が合計 {expected} と一致しません")
    }

    pub fn itemized_total_overridden(declared: impl Display, effective: impl Display) -> String {
        format!("合計 {declared} の代わりに明細の合計 {effective} を使用しました")
    }

    pub fn participant_outside_scope(participant: impl Display) -> String {
        format!("{participant} はこの旅行のメンバーではありません")
    }

    pub fn unbalanced_ledger(participant: impl Display, residual: impl Display) -> String {
        format!("{participant} に {residual} の未精算残高があります")
    }
}

#[cfg(not(feature = "ja"))]
mod messages {
    use super::Display;

    pub fn invalid_split_input(participant: impl Display, reason: impl Display) -> String {
        format!("Invalid split input for {participant} ({reason})")
    }

    pub fn empty_participant_set(total: impl Display) -> String {
        format!("Nobody to split {total} among")
    }

    pub fn negative_total(total: impl Display) -> String {
        format!("Total {total} is negative")
    }

    pub fn duplicate_participant(participant: impl Display) -> String {
        format!("{participant} is listed more than once")
    }

    pub fn zero_total_weight() -> String {
        "Share weights add up to zero".to_string()
    }

    pub fn empty_line_item(index: usize) -> String {
        format!("Line item {index} is not assigned to anyone")
    }

    pub fn negative_line_item(index: usize) -> String {
        format!("Line item {index} has a negative amount")
    }

    pub fn overflow() -> String {
        "Amounts are too large to compute".to_string()
    }

    pub fn invalid_amount(field: impl Display, reason: impl Display) -> String {
        format!("The {field} could not be read ({reason})")
    }

    pub fn sum_mismatch(expected: impl Display, assigned: impl Display) -> String {
        format!("Shares add up to {assigned} instead of {expected}")
    }

    pub fn itemized_total_overridden(declared: impl Display, effective: impl Display) -> String {
        format!("Used the line item sum {effective} instead of the total {declared}")
    }

    pub fn participant_outside_scope(participant: impl Display) -> String {
        format!("{participant} is not a member of this trip")
    }

    pub fn unbalanced_ledger(participant: impl Display, residual: impl Display) -> String {
        format!("{participant} is left with an unsettled {residual}")
    }
}

pub use messages::*;
