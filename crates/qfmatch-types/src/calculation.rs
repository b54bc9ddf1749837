//! Per-recipient results and the round-level outcome.

use std::{collections::BTreeMap, fmt};

use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::{Amount, RecipientId, amount};

/// Matching result for one recipient with at least one qualifying contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calculation {
    /// Sum of all qualifying contributions to this recipient.
    #[serde(with = "amount::serde_str")]
    pub total_received: Amount,
    /// Number of distinct qualifying contributors.
    pub contribution_count: usize,
    /// `Σ floor_sqrt(per-contributor total)`.
    #[serde(with = "amount::serde_str")]
    pub sum_of_sqrt: Amount,
    /// Match after the saturation policy, before any cap.
    #[serde(with = "amount::serde_str")]
    pub matched_without_cap: Amount,
    /// Positive: amount clamped off by the cap. Negative or zero: remaining headroom.
    #[serde(with = "amount::serde_str")]
    pub cap_overflow: Amount,
    /// Final match.
    #[serde(with = "amount::serde_str")]
    pub matched: Amount,
}

impl Calculation {
    /// A fresh calculation with every derived value at zero.
    #[must_use]
    pub fn new(total_received: Amount, contribution_count: usize) -> Self {
        Self {
            total_received,
            contribution_count,
            sum_of_sqrt: Amount::zero(),
            matched_without_cap: Amount::zero(),
            cap_overflow: Amount::zero(),
            matched: Amount::zero(),
        }
    }

    /// Whether the cap clamped this recipient.
    #[must_use]
    pub fn is_capped(&self) -> bool {
        self.cap_overflow > Amount::zero()
    }
}

/// Calculations keyed by recipient, in recipient order.
pub type RecipientsCalculations = BTreeMap<RecipientId, Calculation>;

/// Which branch of the saturation policy a round took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaturationMode {
    /// The pool is split proportionally to raw QF weight.
    Saturated,
    /// Raw QF demand is below the pool and each recipient gets its raw value.
    UnderSaturated,
}

impl fmt::Display for SaturationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saturated => write!(f, "SATURATED"),
            Self::UnderSaturated => write!(f, "UNDER_SATURATED"),
        }
    }
}

// ---------------------------------------------------------------------------
// RoundSummary / RoundOutcome
// ---------------------------------------------------------------------------

/// Aggregate figures describing a finished round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// Number of recipients in the result.
    pub recipients: usize,
    /// `Σ matched` over all recipients.
    #[serde(with = "amount::serde_str")]
    pub total_matched: Amount,
    /// `match_amount − total_matched`: unspent pool plus rounding dust.
    #[serde(with = "amount::serde_str")]
    pub undistributed: Amount,
    /// Saturation branch taken.
    pub saturation: SaturationMode,
    /// Cap redistribution passes run (0 when no cap is configured).
    pub redistribution_passes: usize,
    /// SHA-256 commitment over the calculation map.
    pub result_root: [u8; 32],
}

/// Calculations plus their summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub calculations: RecipientsCalculations,
    pub summary: RoundSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_calculation_starts_at_zero() {
        let calc = Calculation::new(Amount::from(15), 4);
        assert_eq!(calc.total_received, Amount::from(15));
        assert_eq!(calc.contribution_count, 4);
        assert!(calc.matched.is_zero());
        assert!(calc.sum_of_sqrt.is_zero());
        assert!(!calc.is_capped());
    }

    #[test]
    fn negative_overflow_is_headroom_not_cap() {
        let mut calc = Calculation::new(Amount::from(1), 2);
        calc.cap_overflow = Amount::from(-10);
        assert!(!calc.is_capped());
        calc.cap_overflow = Amount::from(3);
        assert!(calc.is_capped());
    }

    #[test]
    fn saturation_mode_display() {
        assert_eq!(SaturationMode::Saturated.to_string(), "SATURATED");
        assert_eq!(SaturationMode::UnderSaturated.to_string(), "UNDER_SATURATED");
    }

    #[test]
    fn calculation_serde_roundtrip_keeps_sign() {
        let mut calc = Calculation::new(Amount::from(34_000_000), 7);
        calc.cap_overflow = Amount::from(-5);
        let json = serde_json::to_string(&calc).unwrap();
        assert!(json.contains("\"cap_overflow\":\"-5\""));
        let back: Calculation = serde_json::from_str(&json).unwrap();
        assert_eq!(calc, back);
    }
}
