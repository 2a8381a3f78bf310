//! Optimal sizing of a [`MembershipFilter`](crate::MembershipFilter).
//!
//! For `n` expected insertions and a target false positive probability `p`,
//! the bit array length `m` and number of hash projectors `k` minimising the
//! false positive rate are:
//!
//! ```text
//! m = ceil((n * ln(p)) / ln(1 / 2^ln(2)))
//! k = round((m / n) * ln(2))
//! ```
//!
//! The modelled false positive probability of a filter holding `n` items is
//! then:
//!
//! ```text
//! P(fp) = (1 - e^(-k * n / m))^k
//! ```
//!
//! Intuitively, `e^(-k * n / m)` approximates the fraction of bits left at 0
//! after `k * n` uniformly distributed bit sets, and a false positive requires
//! all `k` checked bits to be 1. For example with `m = 10^9`, `k = 5` and
//! `n = 10^8`, 60.7% of the bits stay 0 and `P(fp) = 0.393^5 = 0.0094`.
//!
//! All three formulas assume independent, uniform hashing. Collisions make the
//! real density slightly lower at small `m` or `n`, an accepted approximation.

use std::f64::consts::LN_2;

use crate::error::{Error, Result};

/// Compute the optimal bit array length for `expected_insertions` items at a
/// false positive probability of `fpp`.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `expected_insertions` is zero, `fpp`
/// is not within `(0, 1)`, or the resulting length does not fit a `usize`.
pub fn optimal_num_bits(expected_insertions: usize, fpp: f64) -> Result<usize> {
    if expected_insertions == 0 {
        return Err(Error::InvalidArgument(
            "expected insertions must be positive".to_string(),
        ));
    }

    if fpp.is_nan() || fpp <= 0.0 || fpp >= 1.0 {
        return Err(Error::InvalidArgument(format!(
            "false positive rate must be within (0, 1), got {fpp}"
        )));
    }

    let n = expected_insertions as f64;
    let bits = ((n * fpp.ln()) / (1.0 / 2_f64.powf(LN_2)).ln()).ceil();

    if !bits.is_finite() || bits >= usize::MAX as f64 {
        return Err(Error::InvalidArgument(format!(
            "{expected_insertions} insertions at a false positive rate of {fpp} needs \
             {bits} bits, more than can be addressed"
        )));
    }

    Ok(bits as usize)
}

/// Compute the optimal number of hash projectors for `expected_insertions`
/// items spread over `num_bits` bits.
///
/// Always at least 1.
pub fn optimal_num_hashes(expected_insertions: usize, num_bits: usize) -> usize {
    let k = (num_bits as f64 / expected_insertions as f64 * LN_2).round() as usize;
    k.max(1)
}

/// The modelled false positive probability of a filter of `num_bits` bits and
/// `num_hashes` projectors holding `insertions` items.
pub fn false_positive_probability(insertions: usize, num_bits: usize, num_hashes: usize) -> f64 {
    let k = num_hashes as f64;
    let zero_density = (-(k * insertions as f64) / num_bits as f64).exp();
    (1.0 - zero_density).powf(k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimal_num_bits() {
        assert_eq!(optimal_num_bits(10_000, 0.01).unwrap(), 95_851);
        assert_eq!(optimal_num_bits(1_000, 0.01).unwrap(), 9_586);
        assert_eq!(optimal_num_bits(100_000, 0.01).unwrap(), 958_506);
        assert_eq!(optimal_num_bits(1, 0.5).unwrap(), 2);
    }

    #[test]
    fn test_optimal_num_bits_invalid() {
        for (n, p) in [
            (0, 0.01),
            (100, 0.0),
            (100, 1.0),
            (100, -0.5),
            (100, 1.5),
            (100, f64::NAN),
            (100, f64::INFINITY),
        ] {
            assert!(
                matches!(optimal_num_bits(n, p), Err(Error::InvalidArgument(_))),
                "n={n} p={p}"
            );
        }
    }

    #[test]
    fn test_optimal_num_bits_too_large() {
        assert!(matches!(
            optimal_num_bits(usize::MAX, 1e-300),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_optimal_num_hashes() {
        assert_eq!(optimal_num_hashes(10_000, 95_851), 7);
        assert_eq!(optimal_num_hashes(1_000, 9_586), 7);
        assert_eq!(optimal_num_hashes(100_000, optimal_num_bits(100_000, 0.03).unwrap()), 5);

        // A very loose filter would round to zero projectors.
        assert_eq!(optimal_num_hashes(10, optimal_num_bits(10, 0.9).unwrap()), 1);
    }

    #[test]
    fn test_false_positive_probability() {
        let fpp = false_positive_probability(10_000, 95_851, 7);
        assert!((fpp - 0.01).abs() < 1e-4, "got {fpp}");

        // The worked example in the module docs.
        let fpp = false_positive_probability(100_000_000, 1_000_000_000, 5);
        assert!((fpp - 0.00937).abs() < 1e-4, "got {fpp}");

        assert_eq!(false_positive_probability(0, 100, 3), 0.0);
    }
}
