//! The engine's only input record: one funder giving to one recipient.

use serde::{Deserialize, Serialize};

use crate::{Amount, ContributorId, RecipientId, amount};

/// A single contribution. Immutable once handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    /// Who gave.
    pub contributor: ContributorId,
    /// Who received.
    pub recipient: RecipientId,
    /// Fixed-point amount in smallest token units. Must be non-negative.
    #[serde(with = "amount::serde_str")]
    pub amount: Amount,
}

impl Contribution {
    #[must_use]
    pub fn new(
        contributor: impl Into<ContributorId>,
        recipient: impl Into<RecipientId>,
        amount: impl Into<Amount>,
    ) -> Self {
        Self {
            contributor: contributor.into(),
            recipient: recipient.into(),
            amount: amount.into(),
        }
    }
}
