//! Shared test fixtures (feature `test-helpers`).
//!
//! The canonical three-project round from the Gitcoin linear QF worked
//! example: 18 contributions of 1, 4 or 9 whole tokens.

use crate::{Amount, Contribution, amount::scale_factor};

/// `(contributor, recipient, whole tokens)` for the worked example.
pub const WORKED_EXAMPLE: [(&str, &str, u32); 18] = [
    ("sender_1", "project_1", 1),
    ("sender_2", "project_1", 4),
    ("sender_3", "project_1", 1),
    ("sender_4", "project_1", 9),
    ("sender_1", "project_2", 1),
    ("sender_2", "project_2", 1),
    ("sender_3", "project_2", 1),
    ("sender_4", "project_2", 1),
    ("sender_5", "project_2", 1),
    ("sender_6", "project_2", 1),
    ("sender_7", "project_2", 4),
    ("sender_1", "project_3", 1),
    ("sender_2", "project_3", 9),
    ("sender_3", "project_3", 1),
    ("sender_4", "project_3", 9),
    ("sender_5", "project_3", 1),
    ("sender_6", "project_3", 9),
    ("sender_7", "project_3", 4),
];

/// The worked example scaled to `decimals` fixed-point precision.
#[must_use]
pub fn worked_example(decimals: u32) -> Vec<Contribution> {
    let unit = scale_factor(decimals);
    WORKED_EXAMPLE
        .iter()
        .map(|&(contributor, recipient, tokens)| {
            Contribution::new(contributor, recipient, Amount::from(tokens) * &unit)
        })
        .collect()
}

/// Whole tokens in fixed-point units.
#[must_use]
pub fn tokens(whole: u64, decimals: u32) -> Amount {
    Amount::from(whole) * scale_factor(decimals)
}
