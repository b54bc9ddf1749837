//! Linear QF entry points.
//!
//! ```text
//! linear_qf(contributions, match_amount, decimals, options) -> RecipientsCalculations
//! ```
//!
//! Pure: no state survives between calls, inputs are never mutated, and any
//! error aborts the whole call with no partial result.

use qfmatch_types::{
    Amount, Contribution, LinearQfOptions, RecipientsCalculations, Result, RoundConfig,
    RoundOutcome, SaturationMode, validate_round,
};

use crate::{
    MatchObserver, NoopObserver, aggregate_contributions, apply_cap, apply_saturation,
    compute_weights, saturation_mode, summarize,
};

struct Run {
    calculations: RecipientsCalculations,
    saturation: SaturationMode,
    redistribution_passes: usize,
}

fn run(
    contributions: &[Contribution],
    match_amount: &Amount,
    decimals_precision: u32,
    options: &LinearQfOptions,
    observer: &mut dyn MatchObserver,
) -> Result<Run> {
    validate_round(match_amount, decimals_precision, options)?;

    // 1. Aggregate per recipient / contributor
    let aggregation = aggregate_contributions(contributions, &options.minimum_amount)?;
    observer.on_aggregated(&aggregation);

    // 2. Raw QF weights
    let weights = compute_weights(&aggregation, observer)?;

    // 3. Saturation policy
    let saturation = saturation_mode(
        &weights.total_raw_match,
        match_amount,
        options.ignore_saturation,
    );
    observer.on_saturation(saturation, &weights.total_raw_match, match_amount);
    let mut calculations = apply_saturation(weights, match_amount, decimals_precision, saturation);

    // 4. Cap and redistribute
    let redistribution_passes = match &options.matching_cap_amount {
        Some(cap) => apply_cap(&mut calculations, cap, match_amount, observer)?.passes,
        None => 0,
    };

    observer.on_complete(&calculations);
    Ok(Run {
        calculations,
        saturation,
        redistribution_passes,
    })
}

/// Compute QF matches for every recipient with a qualifying contribution.
///
/// # Errors
/// - [`QfError::InvalidArgument`](qfmatch_types::QfError::InvalidArgument)
///   for negative amounts or an out-of-range precision.
/// - [`QfError::ArithmeticInconsistency`](qfmatch_types::QfError::ArithmeticInconsistency),
///   [`QfError::OverflowExceedsPool`](qfmatch_types::QfError::OverflowExceedsPool),
///   [`QfError::RedistributionDiverged`](qfmatch_types::QfError::RedistributionDiverged)
///   on internal invariant violations.
pub fn linear_qf(
    contributions: &[Contribution],
    match_amount: &Amount,
    decimals_precision: u32,
    options: &LinearQfOptions,
) -> Result<RecipientsCalculations> {
    linear_qf_observed(
        contributions,
        match_amount,
        decimals_precision,
        options,
        &mut NoopObserver,
    )
}

/// [`linear_qf`] with an observer receiving intermediate events.
pub fn linear_qf_observed(
    contributions: &[Contribution],
    match_amount: &Amount,
    decimals_precision: u32,
    options: &LinearQfOptions,
    observer: &mut dyn MatchObserver,
) -> Result<RecipientsCalculations> {
    run(contributions, match_amount, decimals_precision, options, observer)
        .map(|run| run.calculations)
}

/// Run a configured round and attach its summary.
///
/// # Errors
/// [`QfError::Configuration`](qfmatch_types::QfError::Configuration) if the
/// config is invalid, otherwise the same errors as [`linear_qf`].
pub fn run_round(config: &RoundConfig, contributions: &[Contribution]) -> Result<RoundOutcome> {
    config.validate()?;
    let run = run(
        contributions,
        &config.match_amount,
        config.decimals_precision,
        &config.options,
        &mut NoopObserver,
    )?;
    let summary = summarize(
        &run.calculations,
        &config.match_amount,
        run.saturation,
        run.redistribution_passes,
    );

    tracing::info!(
        recipients = summary.recipients,
        contributions = contributions.len(),
        saturation = %summary.saturation,
        total_matched = %summary.total_matched,
        undistributed = %summary.undistributed,
        passes = summary.redistribution_passes,
        result_root = hex::encode(summary.result_root),
        "QF round complete"
    );

    Ok(RoundOutcome {
        calculations: run.calculations,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use num_traits::Zero;
    use qfmatch_types::{QfError, RecipientId, fixtures};

    use super::*;

    #[test]
    fn empty_batch_gives_empty_map() {
        let res = linear_qf(&[], &Amount::from(100), 6, &LinearQfOptions::default()).unwrap();
        assert!(res.is_empty());
    }

    #[test]
    fn negative_pool_is_rejected() {
        let err = linear_qf(
            &fixtures::worked_example(6),
            &Amount::from(-1),
            6,
            &LinearQfOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, QfError::InvalidArgument { .. }));
    }

    #[test]
    fn uncapped_round_leaves_overflow_at_zero() {
        let res = linear_qf(
            &fixtures::worked_example(6),
            &Amount::from(100_000_000),
            6,
            &LinearQfOptions::default(),
        )
        .unwrap();
        for calc in res.values() {
            assert!(calc.cap_overflow.is_zero());
            assert_eq!(calc.matched, calc.matched_without_cap);
        }
    }

    #[test]
    fn run_round_summary_matches_calculations() {
        let config = RoundConfig::new(100_000_000u64, 6)
            .with_options(LinearQfOptions::default().with_matching_cap(50_000_000u64));
        let outcome = run_round(&config, &fixtures::worked_example(6)).unwrap();
        assert_eq!(outcome.summary.recipients, 3);
        assert_eq!(outcome.summary.saturation, SaturationMode::Saturated);
        assert_eq!(outcome.summary.redistribution_passes, 2);
        assert_eq!(outcome.summary.total_matched, Amount::from(99_999_999));
        assert_eq!(outcome.summary.undistributed, Amount::from(1));
        assert!(outcome.calculations[&RecipientId::from("project_3")].is_capped());
    }

    #[test]
    fn run_round_wraps_config_errors() {
        let config = RoundConfig::new(-5, 6);
        let err = run_round(&config, &[]).unwrap_err();
        assert!(matches!(err, QfError::Configuration(_)));
    }
}
