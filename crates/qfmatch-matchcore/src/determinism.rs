//! Determinism verification and round summaries.
//!
//! Two parties running the same round over the same contributions must
//! arrive at the exact same calculation map. The `result_root` is a SHA-256
//! commitment over that map, so results can be compared (or published)
//! without shipping the full payload.

use qfmatch_types::{
    Amount, RecipientsCalculations, RoundSummary, SaturationMode, constants::RESULT_ROOT_DOMAIN,
};
use sha2::{Digest, Sha256};

fn update_len_prefixed(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

fn update_amount(hasher: &mut Sha256, amount: &Amount) {
    update_len_prefixed(hasher, &amount.to_signed_bytes_be());
}

/// Compute the result root over a calculation map.
///
/// Commits to, per recipient in map order: the recipient id, contributor
/// count, and every amount field. Identical maps always produce identical
/// roots.
#[must_use]
pub fn compute_result_root(calculations: &RecipientsCalculations) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(RESULT_ROOT_DOMAIN);
    hasher.update((calculations.len() as u64).to_le_bytes());

    for (recipient, calc) in calculations {
        update_len_prefixed(&mut hasher, recipient.as_str().as_bytes());
        hasher.update((calc.contribution_count as u64).to_le_bytes());
        update_amount(&mut hasher, &calc.total_received);
        update_amount(&mut hasher, &calc.sum_of_sqrt);
        update_amount(&mut hasher, &calc.matched_without_cap);
        update_amount(&mut hasher, &calc.cap_overflow);
        update_amount(&mut hasher, &calc.matched);
    }

    let result = hasher.finalize();
    let mut root = [0u8; 32];
    root.copy_from_slice(&result);
    root
}

/// Verify that a calculation map matches the expected root.
#[must_use]
pub fn verify_result_root(calculations: &RecipientsCalculations, expected_root: &[u8; 32]) -> bool {
    compute_result_root(calculations) == *expected_root
}

/// Build the summary for a finished round.
#[must_use]
pub fn summarize(
    calculations: &RecipientsCalculations,
    match_amount: &Amount,
    saturation: SaturationMode,
    redistribution_passes: usize,
) -> RoundSummary {
    let total_matched: Amount = calculations.values().map(|c| &c.matched).sum();
    RoundSummary {
        recipients: calculations.len(),
        undistributed: match_amount - &total_matched,
        total_matched,
        saturation,
        redistribution_passes,
        result_root: compute_result_root(calculations),
    }
}

#[cfg(test)]
mod tests {
    use qfmatch_types::{Calculation, RecipientId};

    use super::*;

    fn calc(matched: u64) -> Calculation {
        let mut calc = Calculation::new(Amount::from(10u32), 2);
        calc.matched_without_cap = Amount::from(matched);
        calc.matched = Amount::from(matched);
        calc
    }

    fn map(entries: &[(&str, u64)]) -> RecipientsCalculations {
        entries
            .iter()
            .map(|&(id, m)| (RecipientId::from(id), calc(m)))
            .collect()
    }

    #[test]
    fn empty_map_deterministic() {
        let empty = RecipientsCalculations::new();
        assert_eq!(compute_result_root(&empty), compute_result_root(&empty));
    }

    #[test]
    fn same_map_same_root() {
        let a = map(&[("p1", 5), ("p2", 7)]);
        let b = map(&[("p2", 7), ("p1", 5)]);
        assert_eq!(compute_result_root(&a), compute_result_root(&b));
    }

    #[test]
    fn different_match_different_root() {
        let a = map(&[("p1", 5)]);
        let b = map(&[("p1", 6)]);
        assert_ne!(compute_result_root(&a), compute_result_root(&b));
    }

    #[test]
    fn sign_of_overflow_matters() {
        let mut a = map(&[("p1", 5)]);
        let mut b = a.clone();
        a.get_mut(&RecipientId::from("p1")).unwrap().cap_overflow = Amount::from(3);
        b.get_mut(&RecipientId::from("p1")).unwrap().cap_overflow = Amount::from(-3);
        assert_ne!(compute_result_root(&a), compute_result_root(&b));
    }

    #[test]
    fn ids_are_length_prefixed() {
        // "ab" + "c" must not collide with "a" + "bc".
        let a = map(&[("ab", 1), ("c", 1)]);
        let b = map(&[("a", 1), ("bc", 1)]);
        assert_ne!(compute_result_root(&a), compute_result_root(&b));
    }

    #[test]
    fn verify_roots() {
        let m = map(&[("p1", 5)]);
        let root = compute_result_root(&m);
        assert!(verify_result_root(&m, &root));
        assert!(!verify_result_root(&m, &[0xAB; 32]));
    }

    #[test]
    fn summary_reports_undistributed() {
        let m = map(&[("p1", 40), ("p2", 59)]);
        let s = summarize(&m, &Amount::from(100), SaturationMode::Saturated, 2);
        assert_eq!(s.recipients, 2);
        assert_eq!(s.total_matched, Amount::from(99));
        assert_eq!(s.undistributed, Amount::from(1));
        assert_eq!(s.redistribution_passes, 2);
        assert_eq!(s.result_root, compute_result_root(&m));
    }
}
