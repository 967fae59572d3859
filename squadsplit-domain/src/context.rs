//! Engine configuration shared by the split calculator, aggregator and reducer.

use crate::model::Money;
use rust_decimal::{Decimal, prelude::ToPrimitive};

const MAX_SPLIT_SCALE: u32 = 18;

/// How the aggregator credits the payer when shares and total disagree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MismatchPolicy {
    /// Credit the payer with the sum of the assigned shares. The unassigned gap stays
    /// with the payer and balances remain zero-sum.
    #[default]
    CreditAssigned,
    /// Credit the payer with the full expense total. The gap later surfaces as an
    /// unbalanced ledger.
    CreditTotal,
}

/// Context for split and settlement computations.
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use squadsplit_domain::{Money, SplitContext};
///
/// let usd = SplitContext::default();
/// assert_eq!(usd.to_minor_units(Decimal::new(1999, 2)), Ok(Money::from_i64(1999)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitContext {
    /// Number of decimal places of the minor unit (2 for cents, 0 for JPY).
    pub scale: u32,
    /// Balances and settlements no further than this from zero count as settled, and
    /// share sums this close to the total raise no `SumMismatch`.
    ///
    /// Defaults to zero: minor-unit arithmetic is exact and remainders are absorbed, so
    /// conservation holds to the cent. Set it to one minor unit to accept the 0.01 drift
    /// of hand-entered amounts.
    pub tolerance: Money,
    pub mismatch_policy: MismatchPolicy,
}

impl Default for SplitContext {
    fn default() -> Self {
        Self {
            scale: 2,
            tolerance: Money::ZERO,
            mismatch_policy: MismatchPolicy::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AtomicUnitConversionError {
    #[error("amount has more precision than the minor unit")]
    NonIntegral,
    #[error("amount does not fit in minor units")]
    OutOfRange,
    #[error("scale {scale} is not supported (max {max_supported})")]
    UnsupportedScale { scale: u32, max_supported: u32 },
}

impl SplitContext {
    pub fn with_scale(scale: u32) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    /// Converts a currency amount (e.g. `12.34`) into minor units under this scale.
    pub fn to_minor_units(self, amount: Decimal) -> Result<Money, AtomicUnitConversionError> {
        let factor = self.scale_factor()?;
        let units = amount
            .checked_mul(factor)
            .ok_or(AtomicUnitConversionError::OutOfRange)?;
        if !units.fract().is_zero() {
            return Err(AtomicUnitConversionError::NonIntegral);
        }
        units
            .to_i64()
            .map(Money::from_i64)
            .ok_or(AtomicUnitConversionError::OutOfRange)
    }

    /// Inverse of [`Self::to_minor_units`], for display.
    pub fn to_decimal(self, money: Money) -> Decimal {
        let mut value = Decimal::from(money.amount());
        // set_scale only fails beyond 28 digits, which MAX_SPLIT_SCALE rules out.
        if self.scale <= MAX_SPLIT_SCALE {
            let _ = value.set_scale(self.scale);
        }
        value
    }

    fn scale_factor(self) -> Result<Decimal, AtomicUnitConversionError> {
        if self.scale > MAX_SPLIT_SCALE {
            return Err(AtomicUnitConversionError::UnsupportedScale {
                scale: self.scale,
                max_supported: MAX_SPLIT_SCALE,
            });
        }
        let factor = 10_i64
            .checked_pow(self.scale)
            .ok_or(AtomicUnitConversionError::UnsupportedScale {
                scale: self.scale,
                max_supported: MAX_SPLIT_SCALE,
            })?;
        Ok(Decimal::from(factor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).expect("valid decimal")
    }

    #[rstest]
    #[case::cents(2, "12.34", Ok(Money::from_i64(1234)))]
    #[case::whole(2, "90", Ok(Money::from_i64(9000)))]
    #[case::yen(0, "1500", Ok(Money::from_i64(1500)))]
    #[case::sub_cent(2, "0.005", Err(AtomicUnitConversionError::NonIntegral))]
    #[case::yen_fraction(0, "10.5", Err(AtomicUnitConversionError::NonIntegral))]
    #[case::negative(2, "-3.10", Ok(Money::from_i64(-310)))]
    fn converts_to_minor_units(
        #[case] scale: u32,
        #[case] amount: &str,
        #[case] expected: Result<Money, AtomicUnitConversionError>,
    ) {
        let context = SplitContext::with_scale(scale);
        assert_eq!(context.to_minor_units(dec(amount)), expected);
    }

    #[test]
    fn rejects_unsupported_scale() {
        let context = SplitContext::with_scale(MAX_SPLIT_SCALE + 1);
        assert_eq!(
            context.to_minor_units(Decimal::ONE),
            Err(AtomicUnitConversionError::UnsupportedScale {
                scale: MAX_SPLIT_SCALE + 1,
                max_supported: MAX_SPLIT_SCALE,
            })
        );
    }

    #[test]
    fn rejects_out_of_range_amount() {
        let context = SplitContext::default();
        assert_eq!(
            context.to_minor_units(dec("100000000000000000000")),
            Err(AtomicUnitConversionError::OutOfRange)
        );
    }

    #[test]
    fn to_decimal_restores_scale() {
        let context = SplitContext::default();
        assert_eq!(context.to_decimal(Money::from_i64(3334)), dec("33.34"));
        assert_eq!(context.to_decimal(Money::from_i64(3334)).to_string(), "33.34");
        assert_eq!(context.to_decimal(Money::from_i64(-5)).to_string(), "-0.05");
    }
}
