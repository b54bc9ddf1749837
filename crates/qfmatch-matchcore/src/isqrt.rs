//! Integer square root over arbitrary-precision amounts.
//!
//! QF weights are built from square roots of contributions. Taking them in
//! floating point would make results machine-dependent, so the engine uses
//! `floor(√n)` computed exactly with Newton's method on integers.

use num_traits::{One, Signed, Zero};
use qfmatch_types::{Amount, QfError, Result};

/// Largest `r` with `r² ≤ n`.
///
/// Newton iteration starting from `n >> 1`:
///
/// ```text
/// x₀     = n >> 1
/// xₖ₊₁   = (xₖ + n / xₖ) >> 1
/// stop when xₖ₊₁ ≥ xₖ, answer xₖ
/// ```
///
/// The sequence decreases monotonically towards the root and converges in
/// `O(log n)` steps.
///
/// # Errors
/// [`QfError::InvalidArgument`] if `n` is negative.
pub fn floor_sqrt(n: &Amount) -> Result<Amount> {
    if n.is_negative() {
        return Err(QfError::invalid(format!(
            "square root of negative value {n} is not supported"
        )));
    }
    if n.is_zero() || n.is_one() {
        return Ok(n.clone());
    }

    let mut x: Amount = n >> 1u32;
    loop {
        let y: Amount = (&x + n / &x) >> 1u32;
        if y >= x {
            return Ok(x);
        }
        x = y;
    }
}
