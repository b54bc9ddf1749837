//! Matching options and round configuration.

use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::{Amount, QfError, Result, amount, constants};

/// Knobs for a single `linear_qf` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearQfOptions {
    /// Contributions strictly below this amount are ignored. Equal is kept.
    #[serde(with = "amount::serde_str")]
    pub minimum_amount: Amount,
    /// Always split the whole pool, even when raw QF demand is below it.
    pub ignore_saturation: bool,
    /// Absolute ceiling on any one recipient's match (an amount, not a percentage).
    #[serde(with = "amount::serde_str_opt")]
    pub matching_cap_amount: Option<Amount>,
}

impl Default for LinearQfOptions {
    fn default() -> Self {
        Self {
            minimum_amount: Amount::zero(),
            ignore_saturation: false,
            matching_cap_amount: None,
        }
    }
}

impl LinearQfOptions {
    #[must_use]
    pub fn with_minimum_amount(mut self, minimum: impl Into<Amount>) -> Self {
        self.minimum_amount = minimum.into();
        self
    }

    #[must_use]
    pub fn with_ignore_saturation(mut self, ignore: bool) -> Self {
        self.ignore_saturation = ignore;
        self
    }

    #[must_use]
    pub fn with_matching_cap(mut self, cap: impl Into<Amount>) -> Self {
        self.matching_cap_amount = Some(cap.into());
        self
    }

    /// Reject negative minimum or cap.
    pub fn validate(&self) -> Result<()> {
        amount::ensure_non_negative("minimum_amount", &self.minimum_amount)?;
        if let Some(cap) = &self.matching_cap_amount {
            amount::ensure_non_negative("matching_cap_amount", cap)?;
        }
        Ok(())
    }
}

/// A complete matching round: pool, precision and options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Size of the matching pool in smallest token units.
    #[serde(with = "amount::serde_str")]
    pub match_amount: Amount,
    /// Fixed-point scale of every amount in the round.
    #[serde(default = "default_decimals_precision")]
    pub decimals_precision: u32,
    #[serde(default)]
    pub options: LinearQfOptions,
}

fn default_decimals_precision() -> u32 {
    constants::DEFAULT_DECIMALS_PRECISION
}

impl RoundConfig {
    #[must_use]
    pub fn new(match_amount: impl Into<Amount>, decimals_precision: u32) -> Self {
        Self {
            match_amount: match_amount.into(),
            decimals_precision,
            options: LinearQfOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: LinearQfOptions) -> Self {
        self.options = options;
        self
    }

    /// Check every field against the engine contract.
    ///
    /// # Errors
    /// [`QfError::Configuration`] wrapping the first violation found.
    pub fn validate(&self) -> Result<()> {
        validate_round(&self.match_amount, self.decimals_precision, &self.options)
            .map_err(|e| QfError::Configuration(e.to_string()))
    }
}

/// Argument checks shared by `RoundConfig::validate` and the engine entry point.
pub fn validate_round(
    match_amount: &Amount,
    decimals_precision: u32,
    options: &LinearQfOptions,
) -> Result<()> {
    amount::ensure_non_negative("match_amount", match_amount)?;
    if decimals_precision > constants::MAX_DECIMALS_PRECISION {
        return Err(QfError::invalid(format!(
            "decimals_precision {decimals_precision} exceeds maximum {}",
            constants::MAX_DECIMALS_PRECISION
        )));
    }
    options.validate()
}
