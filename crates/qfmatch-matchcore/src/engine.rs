//! Raw QF weights and the saturation policy.
//!
//! For a recipient with contributors `c₁..cₖ` the raw QF weight is
//!
//! ```text
//! raw = (Σ √cᵢ)² − Σ cᵢ
//! ```
//!
//! i.e. the pairwise cross terms `2·√cᵢ·√cⱼ`. A single contributor has no
//! pairs and therefore no weight.

use std::collections::BTreeMap;

use num_traits::{Signed, Zero};
use qfmatch_types::{
    Amount, Calculation, QfError, RecipientId, RecipientsCalculations, Result, SaturationMode,
    scale_factor,
};

use crate::{Aggregation, MatchObserver, isqrt::floor_sqrt};

/// Per-recipient calculations with `sum_of_sqrt` filled in, plus raw weights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchWeights {
    pub calculations: RecipientsCalculations,
    /// Raw (unscaled, uncapped) QF weight per recipient.
    pub raw_matches: BTreeMap<RecipientId, Amount>,
    /// `Σ raw_matches`.
    pub total_raw_match: Amount,
}

/// Compute `sum_of_sqrt` and the raw QF weight for every recipient.
///
/// Floor rounding of each square root can push `(Σ √cᵢ)² − Σ cᵢ` below zero
/// for tiny non-square amounts; the weight is clamped at zero.
///
/// # Errors
/// [`QfError::ArithmeticInconsistency`] if the aggregation's totals disagree
/// or the per-recipient and batch-wide square-root sums diverge.
pub fn compute_weights(
    aggregation: &Aggregation,
    observer: &mut dyn MatchObserver,
) -> Result<MatchWeights> {
    aggregation.verify()?;

    let mut calculations = RecipientsCalculations::new();
    let mut raw_matches = BTreeMap::new();
    let mut total_raw_match = Amount::zero();
    let mut batch_sqrt_sum = Amount::zero();

    for (recipient, agg) in &aggregation.per_recipient {
        let mut calc = Calculation::new(agg.total_received.clone(), agg.contributor_count());
        for amount in agg.per_contributor.values() {
            let sqrt = floor_sqrt(amount)?;
            batch_sqrt_sum += &sqrt;
            calc.sum_of_sqrt += sqrt;
        }

        let raw = if calc.contribution_count > 1 {
            let squared = &calc.sum_of_sqrt * &calc.sum_of_sqrt;
            let raw = squared - &calc.total_received;
            if raw.is_negative() { Amount::zero() } else { raw }
        } else {
            Amount::zero()
        };

        observer.on_raw_match(recipient, &calc, &raw);
        total_raw_match += &raw;
        raw_matches.insert(recipient.clone(), raw);
        calculations.insert(recipient.clone(), calc);
    }

    let recipients_sqrt_sum: Amount = calculations.values().map(|c| &c.sum_of_sqrt).sum();
    if recipients_sqrt_sum != batch_sqrt_sum {
        return Err(QfError::ArithmeticInconsistency {
            reason: format!(
                "per-recipient sqrt sum {recipients_sqrt_sum} != batch sqrt sum {batch_sqrt_sum}"
            ),
        });
    }

    Ok(MatchWeights {
        calculations,
        raw_matches,
        total_raw_match,
    })
}

/// Pick the saturation branch.
///
/// Saturated when told to ignore saturation, or when raw QF demand meets or
/// exceeds the pool.
#[must_use]
pub fn saturation_mode(
    total_raw_match: &Amount,
    match_amount: &Amount,
    ignore_saturation: bool,
) -> SaturationMode {
    if ignore_saturation || total_raw_match >= match_amount {
        SaturationMode::Saturated
    } else {
        SaturationMode::UnderSaturated
    }
}

/// Turn raw weights into pre-cap matches.
///
/// - `Saturated`: `floor(raw · match_amount / total_raw_match)`, computed at
///   `10^decimals_precision` extra resolution. Zero total weight matches nobody.
/// - `UnderSaturated`: each recipient receives its raw weight unchanged.
///
/// Sets both `matched_without_cap` and `matched`.
pub fn apply_saturation(
    weights: MatchWeights,
    match_amount: &Amount,
    decimals_precision: u32,
    mode: SaturationMode,
) -> RecipientsCalculations {
    let MatchWeights {
        mut calculations,
        raw_matches,
        total_raw_match,
    } = weights;
    let scale = scale_factor(decimals_precision);

    for (recipient, calc) in &mut calculations {
        let raw = raw_matches.get(recipient).cloned().unwrap_or_default();
        let matched = match mode {
            SaturationMode::Saturated if total_raw_match.is_zero() => Amount::zero(),
            SaturationMode::Saturated => {
                let scaled_share = raw * match_amount * &scale / &total_raw_match;
                scaled_share / &scale
            }
            SaturationMode::UnderSaturated => raw,
        };
        calc.matched_without_cap = matched.clone();
        calc.matched = matched;
    }
    calculations
}
