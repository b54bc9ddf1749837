//! Per-recipient matching cap with iterative overflow redistribution.
//!
//! ## Algorithm
//!
//! Each pass:
//! 1. Clamp every not-yet-capped recipient whose `matched` exceeds the cap;
//!    the excess joins `total_overflow`.
//! 2. Sum `matched` over the recipients still under the cap.
//! 3. Give each of them `floor(matched · total_overflow / total_uncapped)`,
//!    computed from a snapshot taken before any of them is updated.
//!
//! A top-up can push a recipient over the cap, so passes repeat until no
//! overflow is produced. Every pass that produces overflow caps at least one
//! more recipient, so the loop runs at most `recipients + 1` times.
//!
//! Floor division leaves at most one unit per uncapped recipient per pass
//! undistributed ("dust"). Dust is reported, never redistributed.

use std::{cmp::Ordering, collections::BTreeSet};

use num_traits::{Signed, Zero};
use qfmatch_types::{Amount, QfError, RecipientId, RecipientsCalculations, Result};

use crate::{CapPass, MatchObserver};

/// What the redistribution loop did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapReport {
    /// Passes run, including the final converged one.
    pub passes: usize,
    /// Recipients clamped at the cap.
    pub capped: usize,
    /// Overflow left with nobody under the cap to receive it.
    pub stranded: Amount,
    /// Floor-division remainder across all passes.
    pub dust: Amount,
}

/// Recipient processing order: descending `matched`, ties by recipient id.
fn redistribution_order(
    calculations: &RecipientsCalculations,
    capped: &BTreeSet<RecipientId>,
) -> Vec<RecipientId> {
    let mut order: Vec<(&RecipientId, &Amount)> = calculations
        .iter()
        .filter(|(id, _)| !capped.contains(*id))
        .map(|(id, calc)| (id, &calc.matched))
        .collect();
    order.sort_by(|(a_id, a_matched), (b_id, b_matched)| match b_matched.cmp(a_matched) {
        Ordering::Equal => a_id.cmp(b_id),
        other => other,
    });
    order.into_iter().map(|(id, _)| id.clone()).collect()
}

/// Clamp every recipient to `cap` and redistribute the overflow.
///
/// On return `matched ≤ cap` for every recipient and `cap_overflow` holds
/// either the amount clamped off (positive) or the remaining headroom
/// (zero or negative).
///
/// # Errors
/// - [`QfError::InvalidArgument`] if `cap` is negative.
/// - [`QfError::OverflowExceedsPool`] if the clamped total plus pending
///   overflow would exceed `match_amount`.
/// - [`QfError::RedistributionDiverged`] if the pass bound is exceeded.
pub fn apply_cap(
    calculations: &mut RecipientsCalculations,
    cap: &Amount,
    match_amount: &Amount,
    observer: &mut dyn MatchObserver,
) -> Result<CapReport> {
    if cap.is_negative() {
        return Err(QfError::invalid(format!(
            "matching_cap_amount must be non-negative, got {cap}"
        )));
    }

    let max_passes = calculations.len() + 1;
    let mut capped: BTreeSet<RecipientId> = BTreeSet::new();
    let mut dust = Amount::zero();

    for pass in 1..=max_passes {
        let mut total_overflow = Amount::zero();
        let mut total_uncapped = Amount::zero();
        let mut uncapped: Vec<RecipientId> = Vec::new();
        let mut newly_capped = 0;

        // 1-2. Partition into capped / uncapped
        for id in redistribution_order(calculations, &capped) {
            let Some(calc) = calculations.get_mut(&id) else {
                continue;
            };
            let overflow = &calc.matched - cap;
            if overflow.is_positive() {
                calc.matched = cap.clone();
                total_overflow += &overflow;
                calc.cap_overflow = overflow;
                capped.insert(id);
                newly_capped += 1;
            } else {
                calc.cap_overflow = overflow;
                total_uncapped += &calc.matched;
                uncapped.push(id);
            }
        }

        observer.on_cap_pass(&CapPass {
            pass,
            total_overflow: total_overflow.clone(),
            total_uncapped_matched: total_uncapped.clone(),
            uncapped_recipients: uncapped.len(),
            newly_capped,
        });

        if total_overflow.is_zero() {
            return Ok(CapReport {
                passes: pass,
                capped: capped.len(),
                stranded: Amount::zero(),
                dust,
            });
        }

        if total_uncapped.is_zero() {
            tracing::warn!(
                pass,
                stranded = %total_overflow,
                capped = capped.len(),
                "Cap overflow stranded: no recipient left under the cap"
            );
            return Ok(CapReport {
                passes: pass,
                capped: capped.len(),
                stranded: total_overflow,
                dust,
            });
        }

        let distributed: Amount = calculations.values().map(|c| &c.matched).sum();
        if &distributed + &total_overflow > *match_amount {
            return Err(QfError::OverflowExceedsPool {
                overflow: total_overflow,
                distributed,
                pool: match_amount.clone(),
            });
        }

        // 3. Top up uncapped recipients from a snapshot of this pass
        let top_ups: Vec<(RecipientId, Amount)> = uncapped
            .into_iter()
            .map(|id| {
                let share = &calculations[&id].matched * &total_overflow / &total_uncapped;
                (id, share)
            })
            .collect();

        let mut handed_out = Amount::zero();
        for (id, share) in top_ups {
            handed_out += &share;
            if let Some(calc) = calculations.get_mut(&id) {
                calc.matched += share;
            }
        }
        let pass_dust = &total_overflow - &handed_out;

        tracing::debug!(
            pass,
            overflow = %total_overflow,
            redistributed = %handed_out,
            dust = %pass_dust,
            newly_capped,
            "Cap overflow redistributed"
        );
        dust += pass_dust;
    }

    Err(QfError::RedistributionDiverged { passes: max_passes })
}
