//! Fixed-point amounts and unit conversion.
//!
//! Every amount handled by the engine is an arbitrary-precision integer
//! counted in the smallest unit of the funding token (`10^-decimals` of a
//! whole token). The type is signed so that cap headroom can be expressed
//! and negative inputs can be detected and rejected rather than wrapped.
//!
//! `rust_decimal::Decimal` is used only at the human-facing edge: turning
//! "13.6 DAI" into `13_600_000` units and back.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};
use rust_decimal::Decimal;

use crate::{QfError, Result, constants};

/// Arbitrary-precision fixed-point amount (smallest token units).
pub type Amount = BigInt;

/// `10^decimals` as an [`Amount`].
#[must_use]
pub fn scale_factor(decimals: u32) -> Amount {
    Amount::from(10u32).pow(decimals)
}

/// Fail with [`QfError::InvalidArgument`] if `amount` is negative.
pub fn ensure_non_negative(what: &str, amount: &Amount) -> Result<()> {
    if amount.is_negative() {
        return Err(QfError::invalid(format!("{what} must be non-negative, got {amount}")));
    }
    Ok(())
}

/// Convert a human-unit decimal (e.g. `13.6`) into fixed-point units.
///
/// Rejects negative values and values carrying more fractional digits than
/// `decimals` can represent; nothing is rounded away silently.
pub fn to_units(value: Decimal, decimals: u32) -> Result<Amount> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(QfError::invalid(format!("amount must be non-negative, got {value}")));
    }
    let normalized = value.normalize();
    let scale = normalized.scale();
    if scale > decimals {
        return Err(QfError::UnitConversion {
            reason: format!("{value} has {scale} fractional digits, precision is {decimals}"),
        });
    }
    Ok(Amount::from(normalized.mantissa()) * scale_factor(decimals - scale))
}

/// Convert fixed-point units back into a human-unit decimal for reporting.
///
/// Fails if `decimals` exceeds what `Decimal` can scale to, or if the amount
/// does not fit the 96-bit `Decimal` mantissa.
pub fn to_decimal(amount: &Amount, decimals: u32) -> Result<Decimal> {
    if decimals > constants::MAX_DECIMAL_SCALE {
        return Err(QfError::UnitConversion {
            reason: format!(
                "precision {decimals} exceeds decimal scale limit {}",
                constants::MAX_DECIMAL_SCALE
            ),
        });
    }
    let mantissa = amount.to_i128().ok_or_else(|| QfError::UnitConversion {
        reason: format!("{amount} does not fit in 128 bits"),
    })?;
    Decimal::try_from_i128_with_scale(mantissa, decimals).map_err(|e| QfError::UnitConversion {
        reason: format!("{amount} at precision {decimals}: {e}"),
    })
}

/// Serde adapter: [`Amount`] as a decimal string (integers also accepted on input).
pub mod serde_str {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Amount;

    #[derive(Deserialize)]
    #[serde(untagged)]
    pub(super) enum Repr {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    impl Repr {
        pub(super) fn into_amount<E: serde::de::Error>(self) -> Result<Amount, E> {
            match self {
                Self::Text(raw) => raw.trim().parse::<Amount>().map_err(E::custom),
                Self::Signed(n) => Ok(Amount::from(n)),
                Self::Unsigned(n) => Ok(Amount::from(n)),
            }
        }
    }

    pub fn serialize<S: Serializer>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(amount)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        Repr::deserialize(deserializer)?.into_amount()
    }
}

/// Serde adapter: `Option<Amount>` as an optional decimal string.
pub mod serde_str_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{Amount, serde_str::Repr};

    pub fn serialize<S: Serializer>(
        amount: &Option<Amount>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match amount {
            Some(amount) => serializer.collect_str(amount),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Amount>, D::Error> {
        Option::<Repr>::deserialize(deserializer)?
            .map(Repr::into_amount)
            .transpose()
    }
}
