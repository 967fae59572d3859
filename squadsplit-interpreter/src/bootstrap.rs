use rust_decimal::Decimal;
use squadsplit_domain::{AtomicUnitConversionError, MismatchPolicy, SplitContext};
use std::env;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const SCALE_VAR: &str = "SQUADSPLIT_SCALE";
pub const TOLERANCE_VAR: &str = "SQUADSPLIT_TOLERANCE";
pub const MISMATCH_POLICY_VAR: &str = "SQUADSPLIT_MISMATCH_POLICY";

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("SQUADSPLIT_SCALE must be a non-negative integer, got {0:?}")]
    InvalidScale(String),
    #[error("SQUADSPLIT_TOLERANCE must be a non-negative decimal amount, got {0:?}")]
    InvalidTolerance(String),
    #[error("SQUADSPLIT_TOLERANCE cannot be expressed at the configured scale")]
    UnrepresentableTolerance(#[source] AtomicUnitConversionError),
    #[error("SQUADSPLIT_MISMATCH_POLICY must be `credit-assigned` or `credit-total`, got {0:?}")]
    InvalidMismatchPolicy(String),
}

/// Engine configuration read from the environment (and `.env`, when present).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppConfig {
    pub context: SplitContext,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source; unset variables keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut context = SplitContext::default();

        if let Some(raw) = lookup(SCALE_VAR) {
            context.scale = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidScale(raw.clone()))?;
        }

        if let Some(raw) = lookup(MISMATCH_POLICY_VAR) {
            context.mismatch_policy = match raw.trim() {
                "credit-assigned" => MismatchPolicy::CreditAssigned,
                "credit-total" => MismatchPolicy::CreditTotal,
                _ => return Err(ConfigError::InvalidMismatchPolicy(raw)),
            };
        }

        // Converting even the default tolerance rejects unsupported scales up front.
        let tolerance = match lookup(TOLERANCE_VAR) {
            Some(raw) => match raw.trim().parse::<Decimal>() {
                Ok(value) if !value.is_sign_negative() => value,
                _ => return Err(ConfigError::InvalidTolerance(raw)),
            },
            None => Decimal::ZERO,
        };
        context.tolerance = context
            .to_minor_units(tolerance)
            .map_err(ConfigError::UnrepresentableTolerance)?;

        tracing::debug!(
            scale = context.scale,
            tolerance = context.tolerance.amount(),
            mismatch_policy = ?context.mismatch_policy,
            "Configuration loaded"
        );

        Ok(Self { context })
    }
}

/// Initialize logging and tracing
///
/// Reads `RUST_LOG`, falling back to warnings only. Logs go to stderr so that tables on
/// stdout stay clean.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use squadsplit_domain::Money;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[rstest]
    fn defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup(&[])).expect("config");

        assert_eq!(config.context, SplitContext::default());
    }

    #[rstest]
    fn reads_every_variable() {
        let config = AppConfig::from_lookup(lookup(&[
            (SCALE_VAR, "3"),
            (TOLERANCE_VAR, "0.002"),
            (MISMATCH_POLICY_VAR, "credit-total"),
        ]))
        .expect("config");

        assert_eq!(config.context.scale, 3);
        assert_eq!(config.context.tolerance, Money::from_i64(2));
        assert_eq!(config.context.mismatch_policy, MismatchPolicy::CreditTotal);
    }

    #[rstest]
    #[case::scale_not_a_number(
        &[(SCALE_VAR, "two")],
        ConfigError::InvalidScale("two".to_string())
    )]
    #[case::negative_tolerance(
        &[(TOLERANCE_VAR, "-0.01")],
        ConfigError::InvalidTolerance("-0.01".to_string())
    )]
    #[case::tolerance_below_minor_unit(
        &[(TOLERANCE_VAR, "0.001")],
        ConfigError::UnrepresentableTolerance(AtomicUnitConversionError::NonIntegral)
    )]
    #[case::unknown_policy(
        &[(MISMATCH_POLICY_VAR, "payer-wins")],
        ConfigError::InvalidMismatchPolicy("payer-wins".to_string())
    )]
    fn rejects_invalid_values(#[case] vars: &[(&str, &str)], #[case] expected: ConfigError) {
        assert_eq!(AppConfig::from_lookup(lookup(vars)), Err(expected));
    }

    #[rstest]
    fn rejects_unsupported_scale_without_tolerance() {
        let err = AppConfig::from_lookup(lookup(&[(SCALE_VAR, "40")])).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::UnrepresentableTolerance(AtomicUnitConversionError::UnsupportedScale {
                scale: 40,
                ..
            })
        ));
    }
}
