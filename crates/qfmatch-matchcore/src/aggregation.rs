//! Contribution aggregation.
//!
//! Folds the raw contribution list into per-recipient and
//! per-(recipient, contributor) totals. Multiple contributions from the same
//! funder to the same recipient are summed *before* the square root is taken,
//! so splitting a donation into many small ones gains nothing.

use std::collections::BTreeMap;

use num_traits::Zero;
use qfmatch_types::{
    Amount, Contribution, ContributorId, QfError, RecipientId, Result, amount::ensure_non_negative,
};

/// Everything one recipient received, grouped by contributor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedRecipient {
    /// Sum of all qualifying contributions to this recipient.
    pub total_received: Amount,
    /// Summed amount per distinct contributor.
    pub per_contributor: BTreeMap<ContributorId, Amount>,
}

impl AggregatedRecipient {
    /// Number of distinct contributors.
    #[must_use]
    pub fn contributor_count(&self) -> usize {
        self.per_contributor.len()
    }

    fn add(&mut self, contributor: &ContributorId, amount: &Amount) {
        self.total_received += amount;
        *self
            .per_contributor
            .entry(contributor.clone())
            .or_insert_with(Amount::zero) += amount;
    }
}

/// The whole batch, grouped by recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    /// Sum of every qualifying contribution in the batch.
    pub total_received: Amount,
    /// Per-recipient aggregates, in recipient order.
    pub per_recipient: BTreeMap<RecipientId, AggregatedRecipient>,
}

impl Aggregation {
    /// Look up a recipient, creating an empty aggregate on first sight.
    pub fn recipient_mut(&mut self, recipient: &RecipientId) -> &mut AggregatedRecipient {
        self.per_recipient.entry(recipient.clone()).or_default()
    }

    /// Number of recipients with at least one qualifying contribution.
    #[must_use]
    pub fn recipient_count(&self) -> usize {
        self.per_recipient.len()
    }

    /// Cross-check the three independently accumulated totals.
    ///
    /// `total_received == Σ recipient.total_received` and, for every
    /// recipient, `total_received == Σ per_contributor`.
    ///
    /// # Errors
    /// [`QfError::ArithmeticInconsistency`] on any mismatch.
    pub fn verify(&self) -> Result<()> {
        let mut recipients_sum = Amount::zero();
        for (recipient, agg) in &self.per_recipient {
            let pairs_sum: Amount = agg.per_contributor.values().sum();
            if pairs_sum != agg.total_received {
                return Err(QfError::ArithmeticInconsistency {
                    reason: format!(
                        "recipient {recipient}: per-contributor sum {pairs_sum} != total {}",
                        agg.total_received
                    ),
                });
            }
            recipients_sum += &agg.total_received;
        }
        if recipients_sum != self.total_received {
            return Err(QfError::ArithmeticInconsistency {
                reason: format!(
                    "per-recipient sum {recipients_sum} != batch total {}",
                    self.total_received
                ),
            });
        }
        Ok(())
    }
}

/// Group `contributions` by recipient and contributor.
///
/// Contributions with `amount < minimum_amount` are dropped; an amount equal
/// to the minimum is kept. Input order never affects the result.
///
/// # Errors
/// [`QfError::InvalidArgument`] on the first negative amount. Nothing is
/// aggregated in that case.
pub fn aggregate_contributions(
    contributions: &[Contribution],
    minimum_amount: &Amount,
) -> Result<Aggregation> {
    ensure_non_negative("minimum_amount", minimum_amount)?;

    let mut aggregation = Aggregation::default();
    for contribution in contributions {
        // Reject before filtering: a negative amount is always below the minimum.
        ensure_non_negative(
            &format!(
                "contribution {} -> {}",
                contribution.contributor, contribution.recipient
            ),
            &contribution.amount,
        )?;
        if contribution.amount < *minimum_amount {
            continue;
        }

        aggregation.total_received += &contribution.amount;
        aggregation
            .recipient_mut(&contribution.recipient)
            .add(&contribution.contributor, &contribution.amount);
    }
    Ok(aggregation)
}
